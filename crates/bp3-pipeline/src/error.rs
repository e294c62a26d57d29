use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid prediction plan: {0}")]
    InvalidPlan(String),

    #[error("prediction library failed: {0}")]
    Bridge(String),

    #[error("prediction did not produce {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("could not read scores: {0}")]
    Scores(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("pipeline I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
