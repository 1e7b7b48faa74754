use asmtidy::cli;
use asmtidy::contig_rename::{self, DEFAULT_OUTPUT};
use asmtidy::options::RenameOptions;
use clap::Parser;
use peak_alloc::PeakAlloc;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Rename hifiasm contigs based on RagTag AGP output.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input FASTA file from the assembly (may be gzipped)
    #[arg(short, long)]
    query: PathBuf,

    /// RagTag AGP file
    #[arg(short, long)]
    agp: PathBuf,

    /// Output renamed FASTA file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn run() -> anyhow::Result<()> {
    let start = Instant::now();
    let args: Args = cli::parse_args_or_exit();
    cli::init_tracing(args.verbosity);

    let opts = RenameOptions::default();
    contig_rename::rename_contigs(&args.query, &args.agp, &args.output, &opts)?;
    info!("Renamed FASTA file saved as: {}", args.output.display());

    cli::log_run_stats(start, PEAK_ALLOC.peak_usage_as_mb());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
