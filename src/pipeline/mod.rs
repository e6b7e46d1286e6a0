// Batch pipeline
//
// - corpus.rs: load matrices + segment table into an immutable input set
// - sweep.rs: run the estimator over every (parameter, recording) pair
// - report.rs: JSON summary of a sweep

pub mod corpus;
pub mod report;
pub mod sweep;

pub use corpus::{load_matrices, Recording, SimilarityCorpus};
pub use report::{RecordingFailure, SweepPoint, SweepReport};
pub use sweep::{diarize_recording, run_sweep, run_sweep_point};
