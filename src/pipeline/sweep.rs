//! Hyperparameter sweep - one cumulative RTTM file per parameter value

use std::path::PathBuf;

use log::{debug, info, warn};

use super::corpus::{Recording, SimilarityCorpus};
use super::report::{RecordingFailure, SweepPoint, SweepReport};
use crate::clustering::Estimator;
use crate::config::RunConfig;
use crate::error::Result;
use crate::rttm::RttmWriter;
use crate::segments::{merge_segments, Interval};

/// Cluster one recording and merge its labels into speaker turns
pub fn diarize_recording(
    estimator: &dyn Estimator,
    recording: &Recording,
    param: f64,
) -> Result<Vec<Interval>> {
    let labels = estimator.estimate(&recording.similarity, param)?;
    debug!(
        "{}: {} segments, {} speakers",
        recording.id,
        labels.len(),
        count_distinct(&labels)
    );
    Ok(merge_segments(&labels, &recording.segments))
}

/// Run every recording of `corpus` through `estimator` at one parameter
/// value, writing all turns to `rttm_path`.
///
/// A recording that fails to cluster is skipped and reported; I/O errors
/// abort the sweep point.
pub fn run_sweep_point(
    corpus: &SimilarityCorpus,
    estimator: &dyn Estimator,
    param: f64,
    rttm_path: PathBuf,
) -> Result<SweepPoint> {
    let mut writer = RttmWriter::create(&rttm_path)?;
    let mut recordings_written = 0;
    let mut failures = Vec::new();

    for recording in corpus.recordings() {
        match diarize_recording(estimator, recording, param) {
            Ok(turns) => {
                writer.write_recording(&recording.id, &turns)?;
                recordings_written += 1;
            }
            Err(e) => {
                warn!(
                    "{} clustering failed for {} at {:?}: {}",
                    estimator.name(),
                    recording.id,
                    param,
                    e
                );
                failures.push(RecordingFailure {
                    recording: recording.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let lines = writer.lines_written();
    let rttm_path = writer.finish()?;

    Ok(SweepPoint {
        param,
        rttm_path,
        recordings_written,
        lines,
        failures,
    })
}

/// Sweep every parameter value of the configured cluster type
pub fn run_sweep(
    corpus: &SimilarityCorpus,
    estimator: &dyn Estimator,
    config: &RunConfig,
    params: &[f64],
) -> Result<SweepReport> {
    let mut report = SweepReport::new(config);

    for (idx, &param) in params.iter().enumerate() {
        let rttm_path = config.rttm_path(param);
        info!(
            "[{}/{}] {} param={:?} -> {}",
            idx + 1,
            params.len(),
            estimator.name(),
            param,
            rttm_path.display()
        );

        let point = run_sweep_point(corpus, estimator, param, rttm_path)?;
        if !point.failures.is_empty() {
            warn!(
                "param={:?}: {} of {} recordings failed",
                param,
                point.failures.len(),
                corpus.len()
            );
        }
        report.points.push(point);
    }

    Ok(report)
}

fn count_distinct(labels: &[usize]) -> usize {
    let mut sorted = labels.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::{AgglomerativeEstimator, SpectralEstimator};
    use crate::config::{ClusterType, ModelType};
    use crate::segments::SegmentTable;
    use ndarray::{array, Array2};
    use std::path::Path;
    use tempfile::tempdir;

    fn corpus() -> SimilarityCorpus {
        // rec1: two segments close together, one far away (distance matrix)
        let rec1: Array2<f64> = array![[0.0, 0.1, 0.9], [0.1, 0.0, 0.8], [0.9, 0.8, 0.0]];
        // rec2: a single segment
        let rec2: Array2<f64> = array![[0.0]];
        let table = SegmentTable::parse(
            "r1a rec1 0.0 1.0\nr1b rec1 1.0 2.0\nr1c rec1 2.0 3.0\nr2a rec2 0.5 1.25\n",
            Path::new("segments"),
        )
        .unwrap();
        SimilarityCorpus::from_parts(
            vec![("rec2".to_string(), rec2), ("rec1".to_string(), rec1)],
            &table,
        )
        .unwrap()
    }

    fn config(root: &Path, cluster_type: ClusterType) -> RunConfig {
        RunConfig {
            mat_dir: root.join("mats"),
            segments: root.join("segments"),
            output_root: root.to_path_buf(),
            model_type: ModelType::Lstm,
            cluster_type,
            seed: 0,
        }
    }

    #[test]
    fn test_agglomerative_sweep_writes_rttm() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), ClusterType::Agglomerative);
        let corpus = corpus();

        let report = run_sweep(&corpus, &AgglomerativeEstimator, &config, &[0.5, 2.0]).unwrap();

        assert_eq!(report.points.len(), 2);
        let point = &report.points[0];
        assert_eq!(point.rttm_path, dir.path().join("lstm/ahc_0.5/hyp.rttm"));
        assert_eq!(point.recordings_written, 2);
        assert!(point.failures.is_empty());

        let text = std::fs::read_to_string(&point.rttm_path).unwrap();
        assert_eq!(
            text,
            "SPEAKER rec1 0 0.000 2.000 <NA> <NA> 0 <NA> <NA>\n\
             SPEAKER rec1 0 2.000 1.000 <NA> <NA> 1 <NA> <NA>\n\
             SPEAKER rec2 0 0.500 0.750 <NA> <NA> 0 <NA> <NA>\n"
        );

        let text = std::fs::read_to_string(dir.path().join("lstm/ahc_2.0/hyp.rttm")).unwrap();
        assert_eq!(
            text,
            "SPEAKER rec1 0 0.000 3.000 <NA> <NA> 0 <NA> <NA>\n\
             SPEAKER rec2 0 0.500 0.750 <NA> <NA> 0 <NA> <NA>\n"
        );
    }

    #[test]
    fn test_failures_are_isolated() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), ClusterType::Spectral);
        let corpus = corpus();

        // beta below every eigenvalue: no recording can be clustered
        let report = run_sweep(&corpus, &SpectralEstimator::new(0), &config, &[-1.0]).unwrap();

        let point = &report.points[0];
        assert_eq!(point.recordings_written, 0);
        assert_eq!(point.failures.len(), 2);
        assert_eq!(point.failures[0].recording, "rec1");
        assert!(point.failures[0].error.contains("zero clusters"));
        assert_eq!(std::fs::read_to_string(&point.rttm_path).unwrap(), "");
    }

    #[test]
    fn test_rerun_replaces_previous_output() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), ClusterType::Agglomerative);
        let corpus = corpus();

        run_sweep(&corpus, &AgglomerativeEstimator, &config, &[2.0]).unwrap();
        let report = run_sweep(&corpus, &AgglomerativeEstimator, &config, &[2.0]).unwrap();

        let text = std::fs::read_to_string(&report.points[0].rttm_path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
