//! Run configuration: model/cluster selectors and hyperparameter sweeps

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ClusterError;

// Spectral sweep over the eigenvalue threshold `beta`
pub const SPECTRAL_SWEEP_START: f64 = 0.95;
pub const SPECTRAL_SWEEP_STOP: f64 = 1.05;
pub const SPECTRAL_SWEEP_COUNT: usize = 10;

// Agglomerative sweep over the linkage distance threshold
pub const AHC_SWEEP_START: f64 = -2.0;
pub const AHC_SWEEP_STOP: f64 = 2.0;
pub const AHC_SWEEP_COUNT: usize = 9;

pub const RTTM_FILE_NAME: &str = "hyp.rttm";

/// Upstream similarity model that produced the matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Lstm,
    Mask,
    LstmRes,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Lstm => "lstm",
            ModelType::Mask => "mask",
            ModelType::LstmRes => "lstmres",
        }
    }
}

impl FromStr for ModelType {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lstm" => Ok(ModelType::Lstm),
            "mask" => Ok(ModelType::Mask),
            "lstmres" => Ok(ModelType::LstmRes),
            other => Err(ClusterError::InvalidModelType(other.to_string())),
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clustering back-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClusterType {
    /// Spectral clustering, parameter is the eigenvalue threshold
    #[serde(rename = "sc")]
    Spectral,
    /// Agglomerative (average linkage), parameter is the distance threshold
    #[serde(rename = "ahc")]
    Agglomerative,
}

impl ClusterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterType::Spectral => "sc",
            ClusterType::Agglomerative => "ahc",
        }
    }

    /// Default hyperparameter sweep for this back-end
    pub fn sweep(&self) -> SweepRange {
        match self {
            ClusterType::Spectral => SweepRange::new(
                SPECTRAL_SWEEP_START,
                SPECTRAL_SWEEP_STOP,
                SPECTRAL_SWEEP_COUNT,
            ),
            ClusterType::Agglomerative => {
                SweepRange::new(AHC_SWEEP_START, AHC_SWEEP_STOP, AHC_SWEEP_COUNT)
            }
        }
    }
}

impl FromStr for ClusterType {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sc" => Ok(ClusterType::Spectral),
            "ahc" => Ok(ClusterType::Agglomerative),
            other => Err(ClusterError::InvalidClusterType(other.to_string())),
        }
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evenly spaced, inclusive parameter range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRange {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl SweepRange {
    pub fn new(start: f64, stop: f64, count: usize) -> Self {
        Self { start, stop, count }
    }

    /// Sample the range as `start + i * step`, pinning the last value to
    /// `stop` so the endpoints are exact.
    pub fn values(&self) -> Vec<f64> {
        match self.count {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.stop - self.start) / (n - 1) as f64;
                let mut values: Vec<f64> =
                    (0..n).map(|i| i as f64 * step + self.start).collect();
                values[n - 1] = self.stop;
                values
            }
        }
    }
}

/// Everything a `cluster` run needs, resolved from the command line
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub mat_dir: PathBuf,
    pub segments: PathBuf,
    pub output_root: PathBuf,
    pub model_type: ModelType,
    pub cluster_type: ClusterType,
    pub seed: u64,
}

impl RunConfig {
    /// Substitute the model type into a `{}` directory template
    pub fn resolve_mat_dir(template: &str, model_type: ModelType) -> PathBuf {
        PathBuf::from(template.replacen("{}", model_type.as_str(), 1))
    }

    /// `<root>/<model_type>`
    pub fn model_dir(&self) -> PathBuf {
        self.output_root.join(self.model_type.as_str())
    }

    /// `<root>/<model_type>/<cluster_type>_<param>/hyp.rttm`
    pub fn rttm_path(&self, param: f64) -> PathBuf {
        self.model_dir()
            .join(param_dir_name(self.cluster_type, param))
            .join(RTTM_FILE_NAME)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.model_dir()
            .join(format!("{}_sweep.json", self.cluster_type.as_str()))
    }
}

/// Directory name for one sweep point. `{:?}` prints the shortest
/// round-trip representation and keeps `.0` on integral values, so
/// `-2.0` becomes `ahc_-2.0` rather than `ahc_-2`.
pub fn param_dir_name(cluster_type: ClusterType, param: f64) -> String {
    format!("{}_{:?}", cluster_type.as_str(), param)
}
