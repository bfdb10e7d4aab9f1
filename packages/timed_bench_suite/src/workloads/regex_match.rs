//! Searching a shared text for a pattern that must not occur in it.

use std::sync::Arc;

use regex::bytes::Regex;

use crate::{Error, Result};

/// A compiled pattern that the workload expects to find no match for.
///
/// Compilation happens once, when the benchmark is registered. Each worker gets its own clone of
/// the compiled pattern during setup.
///
/// # Examples
///
/// ```
/// use timed_bench_suite::workloads::regex_match::Pattern;
///
/// let pattern = Pattern::new("XYZ$").unwrap();
/// assert_eq!(pattern.as_str(), "XYZ$");
///
/// assert!(Pattern::new("[unclosed").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { regex })
    }

    /// The pattern as it was written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern occurs anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.regex.is_match(text)
    }

    /// Prepares a search of `text` for one worker.
    ///
    /// The returned step searches the whole text and panics if the pattern matches, as that
    /// means either the text or the regex engine is not what the workload was designed for.
    pub fn prepare(&self, text: &Arc<[u8]>) -> impl FnMut() + use<> {
        let regex = self.regex.clone();
        let text = Arc::clone(text);

        move || {
            assert!(
                !regex.is_match(&text),
                "pattern '{}' unexpectedly matched the benchmark text",
                regex.as_str()
            );
        }
    }
}
