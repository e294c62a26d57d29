//! Service configuration
//!
//! Loaded once from a TOML file at startup and handed to [`crate::AppState`].
use anyhow::{bail, Context, Result};
use bp3_pipeline::{PlanSettings, PredictionPlan};
use bp3_storage::{ProxyConfig, StorageConfig, DEFAULT_MAX_CONTENT_LENGTH};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    pub storage: StorageConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub predictor: PredictorConfig,

    #[serde(default)]
    #[validate(nested)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub structure: StructureConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Local working directories, relative to the process working directory
/// unless absolute.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Downloads land in `<staging_dir>/<request id>/`.
    pub staging_dir: PathBuf,
    /// Predictions are written to `<output_dir>/<request id>/`.
    pub output_dir: PathBuf,
    /// ESM-2 encodings shared across requests.
    pub esm_cache_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            staging_dir: PathBuf::from("downloads"),
            output_dir: PathBuf::from("output"),
            esm_cache_dir: PathBuf::from("esm2_encodings"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Interpreter with the `bp3` package importable.
    pub python: String,
    /// Driver script to run instead of the bundled one.
    pub driver: Option<PathBuf>,
    #[serde(flatten)]
    pub plan: PlanSettings,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig {
            python: "python3".to_string(),
            driver: None,
            plan: PlanSettings::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(default)]
pub struct LimitsConfig {
    #[validate(range(min = 1))]
    pub max_content_length: u64,
    /// Reject inputs above `max_content_length` (HEAD request) before downloading.
    pub enforce_max_content_length: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            enforce_max_content_length: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Also print converted FASTA records to stdout.
    pub echo_fasta: bool,
}

impl Default for StructureConfig {
    fn default() -> Self {
        StructureConfig { echo_fasta: true }
    }
}

impl ServiceConfig {
    /// Reads, parses and validates a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("loading config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ServiceConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Field validation plus the checks that span sections.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.storage.validate()?;
        if self.proxy.enabled && self.proxy.url.as_deref().unwrap_or_default().is_empty() {
            bail!("proxy is enabled but proxy.url is not set");
        }
        if let Some(fraction) = self
            .predictor
            .plan
            .top_percents
            .iter()
            .find(|fraction| !(**fraction > 0.0 && **fraction <= 1.0))
        {
            bail!("predictor.top_percents: {fraction} is outside (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.predictor.plan.variable_threshold) {
            bail!("predictor.variable_threshold must be within [0, 1]");
        }
        // fractions that round to the same topNN directory
        PredictionPlan::standard(
            &self.paths.staging_dir.join("input.fasta"),
            &self.paths.esm_cache_dir,
            &self.paths.output_dir.join("check"),
            &self.predictor.plan,
        )
        .validate()
        .context("predictor settings")?;
        Ok(())
    }
}
