use std::path::PathBuf;

use clap::Parser;
use kiln_config::OllamaConfig;
use url::Url;

/// Kiln
#[derive(Debug, Parser)]
#[command(name = "kiln", about = "Send a prompt to an Ollama model and print the reply")]
pub struct Args {
    /// Path to configuration file; without one, settings come from `OLLAMA_URL` and `OLLAMA_MODEL`
    #[arg(short, long, env = "KILN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the inference server URL
    #[arg(long)]
    pub url: Option<Url>,

    /// Override the model
    #[arg(short, long)]
    pub model: Option<String>,

    /// System instruction sent ahead of the prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Print the reply as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Treat the prompt as JSON: a string or an object with a `messages` array
    #[arg(long)]
    pub json: bool,

    /// Prompt text
    pub prompt: String,
}

impl Args {
    /// Apply command line overrides on top of loaded settings
    pub fn apply(&self, config: &mut OllamaConfig) {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }

        if let Some(model) = &self.model {
            config.model.clone_from(model);
        }
    }
}
