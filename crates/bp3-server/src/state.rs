use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use bp3_pipeline::{EnsemblePredictor, PythonBridge};
use bp3_storage::{http_client, Downloader, StorageBackend};
use std::sync::Arc;

/// Everything a request handler needs, shared across requests.
pub struct AppState {
    pub config: ServiceConfig,
    pub downloader: Downloader,
    pub store: StorageBackend,
    pub predictor: Arc<dyn EnsemblePredictor>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        store: StorageBackend,
        predictor: Arc<dyn EnsemblePredictor>,
    ) -> Result<Self> {
        let client = http_client(&config.proxy).context("building download client")?;
        let downloader = Downloader::new(client, config.limits.max_content_length);
        Ok(AppState {
            config,
            downloader,
            store,
            predictor,
        })
    }

    /// Store and predictor as selected by `config`.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let store = StorageBackend::from_config(&config.storage);
        let mut bridge = PythonBridge::new(config.predictor.python.clone());
        if let Some(driver) = &config.predictor.driver {
            bridge = bridge.with_driver(driver.clone());
        }
        Self::new(config, store, Arc::new(bridge))
    }
}
