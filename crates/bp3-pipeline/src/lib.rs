//! # bp3-pipeline
//!
//! Drives the BepiPred-3.0 library through its output generation steps.
//!
//! A [`PredictionPlan`] lists every call in order, each with its own
//! parameters and output directory. An [`EnsemblePredictor`] executes the plan;
//! [`PythonBridge`] does so by handing it to a small Python driver that calls
//! the library. [`Orchestrator`] validates the plan, runs it and checks that
//! the expected outputs were written.
mod error;
mod orchestrator;
mod plan;
mod predictor;
mod scores;

pub use self::error::PipelineError;
pub use self::orchestrator::{Orchestrator, PredictionOutput};
pub use self::plan::{
    top_percent_dir, PipelineStep, PlanSettings, PredictionPlan, DEFAULT_INTERACTIVE_FIGURES,
    DEFAULT_TOP_PERCENTS, DEFAULT_VARIABLE_THRESHOLD, LINSCORE_PLOTS_DIR, MAJORITY_VOTE_DIR,
    RAW_CSV, SCORE_PLOTS_DIR, VARIABLE_THRESHOLD_DIR,
};
pub use self::predictor::{EnsemblePredictor, PythonBridge};
pub use self::scores::{read_scores, read_scores_from_reader, SCORE_COLUMN};
