//! # bp3-server
//!
//! HTTP front end of the BepiPred-3.0 predictor tool.
//!
//! * `POST /bepipred30-predictor` runs a prediction for a PDB or FASTA file URL.
//! * `GET /manifest.json` and `GET /swagger.json` describe the tool to the
//!   workflow platform.
pub mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod manifest;
pub mod state;

pub use self::config::ServiceConfig;
pub use self::error::ServiceError;
pub use self::state::AppState;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(manifest::PREDICT_PATH, post(handlers::predict))
        .route("/manifest.json", get(handlers::manifest))
        .route(manifest::SWAGGER_PATH, get(handlers::swagger))
        .with_state(state)
}

/// Binds `host:port` from the config and serves until the process ends.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::from_config(config)?);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("bepipred3.0 predictor listening on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
