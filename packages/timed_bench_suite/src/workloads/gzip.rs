//! Gzip compression of a shared input buffer.

use std::hint::black_box;
use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use flate2::{Compress, Compression, Crc, FlushCompress, Status};

/// The compression level used by the standard registry.
pub const STANDARD_LEVEL: u32 = 8;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const METHOD_DEFLATE: u8 = 8;
const OS_UNKNOWN: u8 = 0xFF;

/// Extra room added whenever the deflate stream runs out of output space.
const OUTPUT_GROWTH: usize = 16 * 1024;

/// Prepares gzip compression of `input` at `level` for one worker.
///
/// Setup compresses the input once and checks that it decompresses back to the original,
/// panicking otherwise. The returned step compresses the whole input again with a
/// [`Compressor`] owned by this worker, so after setup no iteration allocates.
pub fn prepare(input: &Arc<[u8]>, level: Compression) -> impl FnMut() + use<> {
    let input = Arc::clone(input);

    let mut compressor = Compressor::new(level);
    verify_round_trip(&input, compressor.compress(&input));

    move || {
        black_box(compressor.compress(&input));
    }
}

/// A gzip writer whose deflate state, checksum and output buffer are reset and reused for
/// every member it writes.
///
/// Output is a single gzip member with no file name, no modification time and no extra fields.
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// use flate2::Compression;
/// use flate2::read::GzDecoder;
/// use timed_bench_suite::workloads::gzip::Compressor;
///
/// let mut compressor = Compressor::new(Compression::new(8));
/// let compressed = compressor.compress(b"2.718281828459045").to_vec();
///
/// let mut decompressed = Vec::new();
/// GzDecoder::new(compressed.as_slice())
///     .read_to_end(&mut decompressed)
///     .unwrap();
///
/// assert_eq!(decompressed, b"2.718281828459045");
/// ```
#[derive(Debug)]
pub struct Compressor {
    deflate: Compress,
    crc: Crc,
    header: [u8; 10],
    output: Vec<u8>,
}

impl Compressor {
    /// Creates a compressor for the given level.
    #[must_use]
    pub fn new(level: Compression) -> Self {
        Self {
            deflate: Compress::new(level, false),
            crc: Crc::new(),
            header: header(level),
            output: Vec::new(),
        }
    }

    /// Compresses `input` into one gzip member, replacing the previous output.
    ///
    /// The output buffer keeps its capacity between calls, so once it has grown to fit the
    /// compressed form of an input, compressing that input again does not allocate.
    pub fn compress(&mut self, input: &[u8]) -> &[u8] {
        self.deflate.reset();
        self.crc.reset();
        self.output.clear();

        self.output.extend_from_slice(&self.header);

        loop {
            let consumed = usize::try_from(self.deflate.total_in())
                .expect("deflate cannot consume more bytes than an in-memory slice holds");
            let remaining = input
                .get(consumed..)
                .expect("deflate never reports more input consumed than it was given");

            let status = self
                .deflate
                .compress_vec(remaining, &mut self.output, FlushCompress::Finish)
                .expect("deflate into an in-memory buffer cannot fail");

            if status == Status::StreamEnd {
                break;
            }

            // Ok or BufError: the stream is not finished because the buffer is full.
            self.output.reserve(OUTPUT_GROWTH);
        }

        self.crc.update(input);
        self.output.extend_from_slice(&self.crc.sum().to_le_bytes());
        self.output.extend_from_slice(&self.crc.amount().to_le_bytes());

        &self.output
    }
}

fn header(level: Compression) -> [u8; 10] {
    // Extra flags: 2 for maximum compression, 4 for the fastest algorithm.
    let extra_flags = match level.level() {
        9.. => 2,
        1 => 4,
        _ => 0,
    };

    [
        GZIP_MAGIC[0],
        GZIP_MAGIC[1],
        METHOD_DEFLATE,
        0, // No flags.
        0,
        0,
        0,
        0, // No modification time.
        extra_flags,
        OS_UNKNOWN,
    ]
}

fn verify_round_trip(input: &[u8], compressed: &[u8]) {
    let mut decompressed = Vec::with_capacity(input.len());
    GzDecoder::new(compressed)
        .read_to_end(&mut decompressed)
        .expect("gzip output must decode with the matching decoder");

    assert!(
        decompressed == input,
        "gzip round trip changed the data: {} bytes in, {} bytes out",
        input.len(),
        decompressed.len()
    );
}
