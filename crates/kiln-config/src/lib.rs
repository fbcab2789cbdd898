#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod ollama;
pub mod telemetry;

use serde::Deserialize;

pub use ollama::*;
pub use telemetry::*;

/// Top-level Kiln configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Inference server connection
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Build the configuration purely from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `OLLAMA_URL` is set but is not a valid URL
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            ollama: OllamaConfig::from_env()?,
            telemetry: TelemetryConfig::default(),
        };

        config.validate()?;

        Ok(config)
    }
}
