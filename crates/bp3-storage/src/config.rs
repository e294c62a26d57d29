//! Storage and proxy settings as they appear in the service config file.
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use validator::{Validate, ValidationErrors};

/// Object storage selection, tagged by `backend`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    S3(S3Config),
    Local(LocalConfig),
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            StorageConfig::S3(config) => config.validate(),
            StorageConfig::Local(config) => config.validate(),
        }
    }
}

/// S3-compatible bucket reached with static access keys.
#[derive(Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    #[validate(length(min = 1))]
    pub access_key_id: String,
    #[validate(length(min = 1))]
    pub secret_access_key: String,
    #[validate(url)]
    pub endpoint: String,
    #[validate(length(min = 1))]
    pub region: String,
    #[validate(length(min = 1))]
    pub bucket: String,
    /// Prefix of the public object URLs, without the trailing `/`.
    #[validate(url)]
    pub public_access_url: String,
}

// keeps the secret out of logs
impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("public_access_url", &self.public_access_url)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocalConfig {
    pub root: PathBuf,
    #[validate(length(min = 1))]
    pub public_access_url: String,
}

/// Outbound HTTP proxy for downloads.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
    /// Hosts that bypass the proxy. `localhost` and `127.0.0.1` always do.
    #[serde(default)]
    pub exclude: Vec<String>,
}
