use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use flate2::Compression;
use timed_bench::{Benchmark, Registry, RunConfig, RunOutcome};
use tracing::debug;

use crate::text::shared_text;
use crate::workloads::gzip;
use crate::workloads::regex_match::Pattern;
use crate::{Corpus, Result};

/// Size of the synthetic text searched by the pattern matching benchmarks.
pub const MATCH_TEXT_SIZE: usize = 256 * 1024;

/// Label, pattern. None of the patterns occurs in the synthetic text.
const MATCH_PATTERNS: [(&str, &str); 6] = [
    ("easy0", "ABCDEFGHIJKLMNOPQRSTUVWXYZ$"),
    ("easy0i", "(?i)ABCDEFGHIJklmnopqrstuvwxyz$"),
    ("easy1", "A[AB]B[BC]C[CD]D[DE]E[EF]F[FG]G[GH]H[HI]I[IJ]J$"),
    ("medium", "[XYZ]ABCDEFGHIJKLMNOPQRSTUVWXYZ$"),
    ("hard", "[ -~]*ABCDEFGHIJKLMNOPQRSTUVWXYZ$"),
    (
        "hard1",
        "ABCD|CDEF|EFGH|GHIJ|IJKL|KLMN|MNOP|OPQR|QRST|STUV|UVWX|WXYZ",
    ),
];

/// Builds the registry of all compression and pattern matching benchmarks.
///
/// The compression benchmarks read their input from `corpus`. The pattern matching benchmarks
/// share one synthetic text of [`MATCH_TEXT_SIZE`] bytes. Every benchmark reports MiB/s of input
/// processed.
///
/// # Errors
///
/// Returns [`Error::Pattern`][crate::Error::Pattern] if one of the built-in patterns fails to
/// compile.
pub fn standard_registry(corpus: &Corpus) -> Result<Registry> {
    let mut registry = Registry::new();

    registry
        .register(gzip_benchmark(
            "compress/gzip compression digits, -8",
            corpus.digits_of_e(),
        ))
        .register(gzip_benchmark(
            "compress/gzip compression twain, -8",
            corpus.mark_twain(),
        ));

    let text = shared_text(MATCH_TEXT_SIZE);

    for (label, pattern) in MATCH_PATTERNS {
        registry.register(match_benchmark(label, Pattern::new(pattern)?, &text));
    }

    debug!(benchmarks = registry.len(), "standard registry ready");

    Ok(registry)
}

/// Loads the corpus from `corpus_dir`, then runs the benchmarks of the standard registry that
/// `config` selects, writing one result line per benchmark to `out`.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded or if the runner rejects `config` or fails to
/// write a result. Nothing is run in the first two cases.
pub fn run_standard(
    corpus_dir: &Path,
    config: &RunConfig,
    out: &mut impl Write,
) -> Result<RunOutcome> {
    let corpus = Corpus::load(corpus_dir)?;
    let registry = standard_registry(&corpus)?;

    Ok(timed_bench::run(&registry, config, out)?)
}

fn gzip_benchmark(name: &str, input: &Arc<[u8]>) -> Benchmark {
    let input = Arc::clone(input);
    let bytes = input.len();
    let level = Compression::new(gzip::STANDARD_LEVEL);

    Benchmark::new(name, move || gzip::prepare(&input, level))
        .with_report(move |throughput| throughput.format_mib_per_second(bytes))
}

fn match_benchmark(label: &str, pattern: Pattern, text: &Arc<[u8]>) -> Benchmark {
    let text = Arc::clone(text);
    let bytes = text.len();

    Benchmark::new(format!("regexp/match {label}, 256K"), move || {
        pattern.prepare(&text)
    })
    .with_report(move |throughput| throughput.format_mib_per_second(bytes))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use regex::Regex;
    use timed_bench::Throughput;

    use super::*;
    use crate::text::make_text;

    fn corpus() -> Corpus {
        Corpus::from_texts(
            b"2.71828182845904523536028747135266249775724709369995".to_vec(),
            b"Get your facts first, and then you can distort them as you please.".to_vec(),
        )
    }

    #[test]
    fn registration_order() {
        let registry = standard_registry(&corpus()).unwrap();

        let names: Vec<_> = registry.iter().map(Benchmark::name).collect();

        assert_eq!(
            names,
            [
                "compress/gzip compression digits, -8",
                "compress/gzip compression twain, -8",
                "regexp/match easy0, 256K",
                "regexp/match easy0i, 256K",
                "regexp/match easy1, 256K",
                "regexp/match medium, 256K",
                "regexp/match hard, 256K",
                "regexp/match hard1, 256K",
            ]
        );
    }

    #[test]
    fn each_benchmark_selectable_by_exact_name() {
        let registry = standard_registry(&corpus()).unwrap();

        for benchmark in registry.iter() {
            let filter = Regex::new(&format!("^{}$", regex::escape(benchmark.name()))).unwrap();

            let selected: Vec<_> = registry.matching(&filter).map(Benchmark::name).collect();

            assert_eq!(selected, [benchmark.name()]);
        }
    }

    #[test]
    fn no_pattern_matches_synthetic_text() {
        let text = make_text(MATCH_TEXT_SIZE);

        for (label, pattern) in MATCH_PATTERNS {
            let pattern = Pattern::new(pattern).unwrap();

            assert!(!pattern.is_match(&text), "pattern {label} matched");
        }
    }

    #[test]
    fn every_step_runs_once_without_fault() {
        let registry = standard_registry(&corpus()).unwrap();

        for benchmark in registry.iter() {
            let mut step = benchmark.prepare();
            step();
        }
    }

    #[test]
    fn reports_in_mib_per_second() {
        let registry = standard_registry(&corpus()).unwrap();
        let throughput = Throughput::new(1000, Duration::from_secs(1));

        for benchmark in registry.iter() {
            assert!(benchmark.report(&throughput).ends_with(" MiB/s"));
        }
    }
}
