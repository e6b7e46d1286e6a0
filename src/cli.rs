//! Command-line surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ClusterType, ModelType, RunConfig};
use crate::rttm::RECORDING_COLUMN;

#[derive(Parser, Debug)]
#[command(name = "diarize-cluster")]
#[command(about = "Cluster segment similarity matrices into RTTM speaker turns")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sweep a clustering hyperparameter and write one RTTM file per value
    Cluster(ClusterArgs),
    /// Concatenate RTTM files, grouping lines by recording id
    SortCat(SortCatArgs),
}

#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Similarity matrix directory; `{}` is replaced by the model type
    #[arg(long, default_value = "./exp/ch_{}_mat", env = "DIARIZE_MAT_DIR")]
    pub mat_dir: String,

    /// Model type: lstm, mask or lstmres
    #[arg(long, default_value = "mask", env = "DIARIZE_MODEL_TYPE", value_parser = parse_model_type)]
    pub model_type: ModelType,

    /// Clustering type: sc (spectral) or ahc (agglomerative)
    #[arg(long, default_value = "sc", env = "DIARIZE_CLUSTER_TYPE", value_parser = parse_cluster_type)]
    pub cluster_type: ClusterType,

    /// Segment table (`<segment-id> <recording-id> <start> <end>`)
    #[arg(long, default_value = "exp/ch_segments", env = "DIARIZE_SEGMENTS")]
    pub segments: PathBuf,

    /// Root directory for `<model_type>/<cluster_type>_<param>/hyp.rttm`
    #[arg(long, default_value = "./exp", env = "DIARIZE_OUTPUT_ROOT")]
    pub output_root: PathBuf,

    /// Seed for k-means initialisation (spectral only)
    #[arg(long, default_value_t = 0, env = "DIARIZE_SEED")]
    pub seed: u64,
}

impl ClusterArgs {
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            mat_dir: RunConfig::resolve_mat_dir(&self.mat_dir, self.model_type),
            segments: self.segments,
            output_root: self.output_root,
            model_type: self.model_type,
            cluster_type: self.cluster_type,
            seed: self.seed,
        }
    }
}

fn parse_model_type(s: &str) -> Result<ModelType, String> {
    s.parse().map_err(|e: crate::error::ClusterError| e.to_string())
}

fn parse_cluster_type(s: &str) -> Result<ClusterType, String> {
    s.parse().map_err(|e: crate::error::ClusterError| e.to_string())
}

#[derive(Args, Debug)]
pub struct SortCatArgs {
    /// Zero-based, space-separated column to group by
    #[arg(long, default_value_t = RECORDING_COLUMN)]
    pub column: usize,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// RTTM files to merge
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_defaults() {
        let cli = Cli::try_parse_from(["diarize-cluster", "cluster"]).unwrap();
        let Command::Cluster(args) = cli.command else {
            panic!("expected cluster subcommand");
        };
        let config = args.into_config();

        assert_eq!(config.model_type, ModelType::Mask);
        assert_eq!(config.cluster_type, ClusterType::Spectral);
        assert_eq!(config.mat_dir, PathBuf::from("./exp/ch_mask_mat"));
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_cluster_selectors() {
        let cli = Cli::try_parse_from([
            "diarize-cluster",
            "cluster",
            "--model-type",
            "lstmres",
            "--cluster-type",
            "ahc",
            "--mat-dir",
            "/data/{}/mats",
        ])
        .unwrap();
        let Command::Cluster(args) = cli.command else {
            panic!("expected cluster subcommand");
        };
        let config = args.into_config();

        assert_eq!(config.cluster_type, ClusterType::Agglomerative);
        assert_eq!(config.mat_dir, PathBuf::from("/data/lstmres/mats"));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let err = Cli::try_parse_from(["diarize-cluster", "cluster", "--model-type", "gru"])
            .unwrap_err();
        assert!(err.to_string().contains("invalid model type 'gru'"));

        let err = Cli::try_parse_from(["diarize-cluster", "cluster", "--cluster-type", "dbscan"])
            .unwrap_err();
        assert!(err.to_string().contains("invalid cluster type 'dbscan'"));
    }

    #[test]
    fn test_sort_cat_args() {
        let cli = Cli::try_parse_from(["diarize-cluster", "sort-cat", "a.rttm", "b.rttm"]).unwrap();
        let Command::SortCat(args) = cli.command else {
            panic!("expected sort-cat subcommand");
        };
        assert_eq!(args.column, 1);
        assert_eq!(args.files.len(), 2);
        assert!(args.output.is_none());

        assert!(Cli::try_parse_from(["diarize-cluster", "sort-cat"]).is_err());
    }
}
