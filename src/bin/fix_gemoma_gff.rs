use asmtidy::cli;
use asmtidy::gff_fix::{self, DEFAULT_OUTPUT};
use asmtidy::options::FixGffOptions;
use clap::Parser;
use peak_alloc::PeakAlloc;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Rebuild a GeMoMa GFF3 annotation into a clean gene/mRNA/CDS hierarchy.
///
/// Records of the low-confidence source are dropped, CDS records are grouped under their
/// parent mRNA, and every mRNA with at least one CDS is written out as a new gene, mRNA and
/// CDS set with freshly numbered identifiers.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// GFF3 file written by GeMoMa (may be gzipped)
    input_gff: PathBuf,

    /// Output GFF3 file
    #[arg(default_value = DEFAULT_OUTPUT)]
    output_gff: PathBuf,

    /// Records whose source column equals this value are discarded
    #[arg(long, default_value = "GAF")]
    drop_source: String,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn run() -> anyhow::Result<()> {
    let start = Instant::now();
    let args: Args = cli::parse_args_or_exit();
    cli::init_tracing(args.verbosity);

    let opts = FixGffOptions::with_drop_source(&args.drop_source);
    gff_fix::fix_gemoma_gff(&args.input_gff, &args.output_gff, &opts)?;
    info!("Fixed GFF written to: {}", args.output_gff.display());

    cli::log_run_stats(start, PEAK_ALLOC.peak_usage_as_mb());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
