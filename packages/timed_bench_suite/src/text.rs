//! Reproducible synthetic text for workloads that need input data without a corpus file.

use std::sync::Arc;

const SEED: u32 = u32::MAX;
const FEEDBACK_TAPS: u32 = 0x8888_8EEF;
const NEWLINE_PERIOD: u32 = 31;
const FIRST_PRINTABLE: u8 = b' ';
const PRINTABLE_COUNT: u32 = 95;

/// An endless stream of printable ASCII bytes interspersed with newlines, always the same
/// sequence for every instance.
///
/// The sequence comes from a 32-bit linear feedback shift register. About one byte in 31 is a
/// newline and the rest are spread over the printable range from `' '` to `'~'`. The text is
/// random enough that the regex workloads find no match in it.
///
/// # Examples
///
/// ```
/// use timed_bench_suite::text::TextGenerator;
///
/// let start: Vec<u8> = TextGenerator::new().take(8).collect();
/// assert_eq!(start, b"c(6@aDiT");
/// ```
#[derive(Clone, Debug)]
pub struct TextGenerator {
    state: u32,
}

impl TextGenerator {
    /// Creates a generator positioned at the start of the sequence.
    #[must_use]
    pub fn new() -> Self {
        Self { state: SEED }
    }
}

impl Default for TextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for TextGenerator {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.state = self.state.wrapping_add(self.state) ^ 1;

        if self.state.leading_zeros() == 0 {
            self.state ^= FEEDBACK_TAPS;
        }

        if self.state % NEWLINE_PERIOD == 0 {
            return Some(b'\n');
        }

        let offset = u8::try_from(self.state % PRINTABLE_COUNT)
            .expect("remainder of division by 95 always fits in u8");

        Some(
            FIRST_PRINTABLE
                .checked_add(offset)
                .expect("offset below 95 keeps the byte within printable ASCII"),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Returns the first `len` bytes of the [`TextGenerator`] sequence.
///
/// A shorter text is always a prefix of a longer one.
#[must_use]
pub fn make_text(len: usize) -> Vec<u8> {
    TextGenerator::new().take(len).collect()
}

/// Same as [`make_text()`] but in a buffer that workers can share without copying.
#[must_use]
pub fn shared_text(len: usize) -> Arc<[u8]> {
    make_text(len).into()
}
