use serde::Deserialize;
use url::Url;

/// Environment variable holding the inference server base URL
pub const URL_ENV: &str = "OLLAMA_URL";

/// Environment variable holding the model identifier
pub const MODEL_ENV: &str = "OLLAMA_MODEL";

/// Base URL used when none is configured
pub const DEFAULT_URL: &str = "http://localhost:11434";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "qwen3:32b";

/// Connection settings for the Ollama inference server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the server (the chat endpoint is appended)
    #[serde(default = "default_url")]
    pub url: Url,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
        }
    }
}

impl OllamaConfig {
    /// Read `OLLAMA_URL` and `OLLAMA_MODEL`, falling back to the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if `OLLAMA_URL` is set to something that is not a URL
    pub fn from_env() -> anyhow::Result<Self> {
        let url = match std::env::var(URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Url::parse(raw.trim())
                .map_err(|e| anyhow::anyhow!("invalid {URL_ENV} value `{raw}`: {e}"))?,
            _ => default_url(),
        };

        let model = match std::env::var(MODEL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().to_owned(),
            _ => default_model(),
        };

        tracing::debug!(url = %url, model = %model, "resolved ollama configuration from environment");

        Ok(Self { url, model })
    }
}

#[allow(clippy::missing_panics_doc)]
fn default_url() -> Url {
    Url::parse(DEFAULT_URL).expect("valid default URL")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}
