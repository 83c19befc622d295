use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::client::HttpSnapshotSource;
use crate::config::Config;
use crate::render::OutputFormat;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    metrics_port: u16,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        metrics_port: u16,
        output: Option<OutputFormat>,
    ) -> Self {
        let output = output.unwrap_or(config.output);
        Self {
            config: Arc::new(config),
            config_path,
            metrics_port,
            output,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn metrics_port(&self) -> u16 {
        self.metrics_port
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn source(&self) -> Result<HttpSnapshotSource> {
        Ok(HttpSnapshotSource::from_config(&self.config)?)
    }
}
