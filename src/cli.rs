//! Helpers shared by the `fix_gemoma_gff` and `rename_contigs` binaries.

use clap::Parser;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Parses the command line into `P`.
///
/// Usage errors are printed by clap and end the process with status 1; `--help` and
/// `--version` end it with status 0.
pub fn parse_args_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

/// Maps the number of `-v` flags to the default log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global `tracing` subscriber, logging to stderr. `RUST_LOG` overrides the
/// level chosen by `verbosity`.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbosity).into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Logs the wall time since `start` and the peak heap usage reported by the binary's
/// allocator.
pub fn log_run_stats(start: Instant, peak_mem_mb: f32) {
    debug!("finished in {:?}", start.elapsed());
    debug!("peak memory usage was {:.2} MB", peak_mem_mb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::INFO);
        assert_eq!(level_for_verbosity(1), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(5), LevelFilter::TRACE);
    }
}
