//! Runs a plan and checks what it produced.
use crate::error::PipelineError;
use crate::plan::PredictionPlan;
use crate::predictor::EnsemblePredictor;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Where a finished prediction left its files.
#[derive(Clone, Debug)]
pub struct PredictionOutput {
    pub out_dir: PathBuf,
    pub raw_csv: PathBuf,
}

pub struct Orchestrator<'p> {
    predictor: &'p dyn EnsemblePredictor,
}

impl<'p> Orchestrator<'p> {
    pub fn new(predictor: &'p dyn EnsemblePredictor) -> Self {
        Orchestrator { predictor }
    }

    /// Validates `plan`, executes it, then confirms the raw CSV and every
    /// step's output directory exist.
    ///
    /// Steps are not individually guarded: the first failure ends the run.
    pub fn run(&self, plan: &PredictionPlan) -> Result<PredictionOutput, PipelineError> {
        plan.validate()?;
        fs::create_dir_all(plan.out_dir())?;

        info!(
            "starting prediction into {} ({} steps)",
            plan.out_dir().display(),
            plan.steps().len()
        );
        let started = Instant::now();
        self.predictor.execute(plan)?;

        let raw_csv = plan.raw_csv();
        let expected = plan
            .steps()
            .iter()
            .filter_map(|step| step.out_dir())
            .map(|dir| dir.to_path_buf())
            .chain(std::iter::once(raw_csv.clone()));
        for path in expected {
            if !path.exists() {
                return Err(PipelineError::MissingOutput(path));
            }
        }

        info!("prediction finished in {:.1?}", started.elapsed());
        Ok(PredictionOutput {
            out_dir: plan.out_dir().to_path_buf(),
            raw_csv,
        })
    }
}
