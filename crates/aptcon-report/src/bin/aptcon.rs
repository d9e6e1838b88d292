//! aptcon CLI: spatial co-occurrence statistics over an ion cloud.
//!
//! ```bash
//! aptcon --ions ions.jsonl --ranges ranges.json \
//!     --block-size 100 --bin-size 25 [--decompose] --out results/
//! ```
//!
//! Reads a JSONL ion file and a JSON range table, runs the contingency
//! analysis, prints the rendered report, and writes the artifact bundle.

use anyhow::Result;
use aptcon_core::{AnalysisConfig, CoOccurrenceAnalysis};
use aptcon_report::{read_dataset, read_ranges, render_report, OutputBundle};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "aptcon",
    version,
    about = "Pairwise spatial co-occurrence (contingency-table) statistics for atom-probe ion clouds"
)]
struct Args {
    /// Ion records, one JSON object per line
    #[arg(long)]
    ions: PathBuf,

    /// Range table (ordered ion type list)
    #[arg(long)]
    ranges: PathBuf,

    /// Ions per spatial block (1..=1000)
    #[arg(long, default_value_t = 100)]
    block_size: u32,

    /// Ions per count bin (must not exceed block size)
    #[arg(long, default_value_t = 25)]
    bin_size: u32,

    /// Expand molecular types into elemental constituents
    #[arg(long)]
    decompose: bool,

    /// Output directory for summary.json, report.txt, and CSV tables
    #[arg(long, default_value = "results")]
    out: PathBuf,

    /// Skip writing output files, print the report only
    #[arg(long)]
    no_files: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args = Args::parse();

    let config = AnalysisConfig {
        block_size: args.block_size,
        bin_size: args.bin_size,
        decompose: args.decompose,
    };
    if let Err(err) = config.validate() {
        // Surface the guidance message before exiting, per the config
        // contract: no computation happens on invalid parameters.
        eprintln!("{}", err.user_message());
        std::process::exit(2);
    }

    let ranges = read_ranges(&args.ranges)?;
    let dataset = read_dataset(&args.ions, &ranges)?;

    let report = match CoOccurrenceAnalysis::new(config).run(&dataset) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    };

    print!("{}", render_report(&report));

    if !args.no_files {
        let bundle = OutputBundle::new(&args.out)?;
        let files = bundle.write(&report)?;
        log::info!("analysis complete: {} artifacts", files.len());
    }

    Ok(())
}
