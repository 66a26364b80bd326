//! Sample Merge CLI
//!
//! Merges per-run sample stores produced by a sampling profiler into
//! one cumulative store.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use sample_merge::commands::{execute_merge, validate_args, MergeArgs};
use sample_merge::utils::config::DEFAULT_BASE_DIR;

/// Sample Merge - cumulate sampling-profiler sample stores
#[derive(Parser, Debug)]
#[command(name = "sample-merge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Binary image name, or an explicit list of sample store files
    #[arg(required = true)]
    images: Vec<String>,

    /// Counter index selecting the event configuration when an image
    /// carries samples for more than one
    #[arg(short = 'c', long = "use-counter", default_value_t = 0)]
    counter: usize,

    /// Base directory of the sampling daemon's sample tree
    #[arg(short, long, default_value = DEFAULT_BASE_DIR)]
    base_dir: PathBuf,

    /// Output path for the merged store (default: derived from the
    /// first input's encoded filename)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = MergeArgs {
        images: cli.images,
        counter: cli.counter,
        base_dir: cli.base_dir,
        output: cli.output,
    };

    // Validate args first
    validate_args(&args)?;

    // Execute merge
    execute_merge(args)?;

    Ok(())
}
