use crate::config::ServiceConfig;
use anyhow::Context;
use std::path::PathBuf;

pub fn execute(config: PathBuf, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServiceConfig::load(&config)?;
    if let Some(port) = port {
        config.port = port;
    }
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(crate::serve(config))
}
