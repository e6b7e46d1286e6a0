//! Speaker clustering post-processing for diarization.
//!
//! Turns per-recording segment similarity matrices into speaker labels
//! (spectral or agglomerative clustering), merges labelled segments into
//! speaker turns and writes them as RTTM, sweeping one clustering
//! hyperparameter per run.

pub mod cli;
pub mod clustering;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rttm;
pub mod segments;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use cli::{Cli, Command, SortCatArgs};
use config::RunConfig;
use pipeline::{run_sweep, SimilarityCorpus};

pub use error::ClusterError;

// ============== Commands ==============

/// Load the corpus, sweep the configured parameter range and write the
/// sweep report next to the RTTM directories.
pub fn run_cluster(config: &RunConfig) -> Result<()> {
    info!("Configuration: {:#?}", config);

    let corpus = SimilarityCorpus::load(&config.mat_dir, &config.segments).with_context(|| {
        format!(
            "Failed to load corpus from {} and {}",
            config.mat_dir.display(),
            config.segments.display()
        )
    })?;

    let estimator = clustering::estimator_for(config.cluster_type, config.seed);
    let params = config.cluster_type.sweep().values();

    let report = run_sweep(&corpus, estimator.as_ref(), config, &params)?;

    let summary_path = config.summary_path();
    report
        .write_json(&summary_path)
        .with_context(|| format!("Failed to write sweep report {}", summary_path.display()))?;

    info!(
        "Sweep complete: {} parameter values, {} with failed recordings, report at {}",
        report.points.len(),
        report.failed_points(),
        summary_path.display()
    );
    Ok(())
}

pub fn run_sort_cat(args: &SortCatArgs) -> Result<()> {
    let lines = rttm::sort_and_cat(&args.files, args.column)?;

    match &args.output {
        Some(path) => {
            rttm::lines_to_file(&lines, path, false)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} lines to {}", lines.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for line in &lines {
                out.write_all(line.as_bytes())?;
            }
            out.flush()?;
        }
    }
    Ok(())
}

// ============== Main Entry ==============

pub fn run() -> Result<()> {
    // Initialize env_logger to output to stderr (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Cluster(args) => run_cluster(&args.into_config()),
        Command::SortCat(args) => run_sort_cat(&args),
    }
}
