//! Execution of a plan against the BepiPred-3.0 library.
use crate::error::PipelineError;
use crate::plan::PredictionPlan;
use anyhow::{bail, Context};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Runs every step of a plan, in order.
pub trait EnsemblePredictor: Send + Sync {
    fn execute(&self, plan: &PredictionPlan) -> Result<(), PipelineError>;
}

const DRIVER: &str = include_str!("../python/bp3_driver.py");

/// Lines of driver stderr kept in the error message.
const STDERR_TAIL: usize = 20;

/// Hands the plan to a Python interpreter that has the `bp3` package installed.
///
/// The plan is written as JSON to a temporary file whose path is the driver's
/// only argument. The bundled driver is passed with `-c` unless `driver`
/// points at a script on disk.
#[derive(Clone, Debug)]
pub struct PythonBridge {
    python: String,
    driver: Option<PathBuf>,
}

impl PythonBridge {
    pub fn new(python: impl Into<String>) -> Self {
        PythonBridge {
            python: python.into(),
            driver: None,
        }
    }

    pub fn with_driver(mut self, driver: impl Into<PathBuf>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    fn run_driver(&self, plan: &PredictionPlan) -> anyhow::Result<()> {
        let mut plan_file = tempfile::Builder::new()
            .prefix("bp3-plan-")
            .suffix(".json")
            .tempfile()
            .context("creating plan file")?;
        serde_json::to_writer(&mut plan_file, plan).context("writing plan file")?;
        plan_file.flush()?;

        let mut command = Command::new(&self.python);
        match &self.driver {
            Some(script) => command.arg(script),
            None => command.arg("-c").arg(DRIVER),
        };
        command.arg(plan_file.path());

        info!(
            "running prediction driver with {} ({} steps)",
            self.python,
            plan.steps().len()
        );
        let output = command
            .output()
            .with_context(|| format!("starting `{}`", self.python))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("driver: {line}");
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL)..].join("\n");
            bail!("driver exited with {}: {}", output.status, tail);
        }
        Ok(())
    }
}

impl EnsemblePredictor for PythonBridge {
    fn execute(&self, plan: &PredictionPlan) -> Result<(), PipelineError> {
        self.run_driver(plan)
            .map_err(|e| PipelineError::Bridge(format!("{e:#}")))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::plan::PlanSettings;
    use std::path::Path;

    fn plan() -> PredictionPlan {
        PredictionPlan::standard(
            Path::new("in.fasta"),
            Path::new("esm2_encodings"),
            Path::new("out"),
            &PlanSettings::default(),
        )
    }

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("driver.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_driver_receives_plan_json() {
        let dir = tempfile::tempdir().unwrap();
        let driver = script(
            dir.path(),
            "grep -q '\"step\":\"run_ensemble\"' \"$1\" || exit 7\n",
        );
        let bridge = PythonBridge::new("sh").with_driver(driver);
        bridge.execute(&plan()).unwrap();
    }

    #[test]
    fn test_driver_failure_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let driver = script(dir.path(), "echo 'ModuleNotFoundError: bp3' >&2\nexit 3\n");
        let bridge = PythonBridge::new("sh").with_driver(driver);
        match bridge.execute(&plan()) {
            Err(PipelineError::Bridge(message)) => {
                assert!(message.contains("ModuleNotFoundError: bp3"), "{message}")
            }
            other => panic!("expected bridge error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_interpreter() {
        let bridge = PythonBridge::new("/nonexistent/python3");
        assert!(matches!(bridge.execute(&plan()), Err(PipelineError::Bridge(_))));
    }
}
