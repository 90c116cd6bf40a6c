//! Runs the pipeline for the binary

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{Pipeline, RunReport};
use tracing::{info, warn};

/// Resolves configuration and drives one pipeline run
#[derive(Debug, Default)]
pub struct Runner;

impl Runner {
    /// Create a new runner
    pub fn new() -> Self {
        Self
    }

    /// Read the environment, wire the pipeline and run it
    pub async fn run(&self) -> Result<RunReport> {
        let config = PipelineConfig::from_env()?;
        info!(
            "Configured for bucket '{}', dataset '{}', fetch mode {:?}",
            config.gcs_bucket, config.dataset_id, config.fetch_mode
        );

        let pipeline = Pipeline::from_config(config)?;
        let report = pipeline.run().await?;

        if let Some(load_error) = &report.load_error {
            warn!("Run finished without loading the warehouse: {load_error}");
        }

        Ok(report)
    }
}
