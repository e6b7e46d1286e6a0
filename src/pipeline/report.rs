//! Sweep report - which parameter values produced which RTTM files and
//! which recordings failed along the way

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{ClusterType, ModelType, RunConfig};

#[derive(Debug, Clone, Serialize)]
pub struct RecordingFailure {
    pub recording: String,
    pub error: String,
}

/// Outcome of one parameter value
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub param: f64,
    pub rttm_path: PathBuf,
    pub recordings_written: usize,
    /// RTTM lines written across all recordings
    pub lines: usize,
    pub failures: Vec<RecordingFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub model_type: ModelType,
    pub cluster_type: ClusterType,
    pub mat_dir: PathBuf,
    pub segments: PathBuf,
    pub created_at: DateTime<Utc>,
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            model_type: config.model_type,
            cluster_type: config.cluster_type,
            mat_dir: config.mat_dir.clone(),
            segments: config.segments.clone(),
            created_at: Utc::now(),
            points: Vec::new(),
        }
    }

    pub fn failed_points(&self) -> usize {
        self.points.iter().filter(|p| !p.failures.is_empty()).count()
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }
}
