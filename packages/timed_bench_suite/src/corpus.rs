use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::{Error, Result};

/// File name of the digits of e inside the corpus directory.
pub const DIGITS_OF_E_FILE: &str = "e.txt";

/// File name of the Mark Twain prose inside the corpus directory.
pub const MARK_TWAIN_FILE: &str = "mt.txt";

/// Input texts for the compression workloads, loaded once and shared read-only by all workers.
///
/// # Examples
///
/// ```
/// use timed_bench_suite::Corpus;
///
/// let corpus = Corpus::from_texts(b"2.7182818284".to_vec(), b"Ye olde prose".to_vec());
///
/// assert_eq!(corpus.digits_of_e().len(), 12);
/// ```
#[derive(Clone)]
pub struct Corpus {
    digits_of_e: Arc<[u8]>,
    mark_twain: Arc<[u8]>,
}

impl Corpus {
    /// Reads [`DIGITS_OF_E_FILE`] and [`MARK_TWAIN_FILE`] from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorpusRead`] if either file cannot be read and [`Error::EmptyCorpus`]
    /// if either file is empty.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        Ok(Self {
            digits_of_e: read_text(dir.join(DIGITS_OF_E_FILE))?,
            mark_twain: read_text(dir.join(MARK_TWAIN_FILE))?,
        })
    }

    /// Creates a corpus from texts that are already in memory.
    #[must_use]
    pub fn from_texts(digits_of_e: impl Into<Arc<[u8]>>, mark_twain: impl Into<Arc<[u8]>>) -> Self {
        Self {
            digits_of_e: digits_of_e.into(),
            mark_twain: mark_twain.into(),
        }
    }

    /// The digits of e.
    #[must_use]
    pub fn digits_of_e(&self) -> &Arc<[u8]> {
        &self.digits_of_e
    }

    /// Prose by Mark Twain.
    #[must_use]
    pub fn mark_twain(&self) -> &Arc<[u8]> {
        &self.mark_twain
    }
}

impl fmt::Debug for Corpus {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corpus")
            .field("digits_of_e_len", &self.digits_of_e.len())
            .field("mark_twain_len", &self.mark_twain.len())
            .finish()
    }
}

fn read_text(path: PathBuf) -> Result<Arc<[u8]>> {
    let contents = match fs::read(&path) {
        Ok(contents) => contents,
        Err(source) => return Err(Error::CorpusRead { path, source }),
    };

    if contents.is_empty() {
        return Err(Error::EmptyCorpus { path });
    }

    debug!(path = %path.display(), bytes = contents.len(), "loaded corpus file");

    Ok(contents.into())
}
