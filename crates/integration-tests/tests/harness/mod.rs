#![allow(dead_code)]

pub mod mock_ollama;

use kiln_config::OllamaConfig;
use kiln_llm::OllamaLanguageModel;
use url::Url;

/// Model name the tests send
pub const MODEL: &str = "qwen3:32b";

/// Language model pointed at the given base URL
pub fn model_at(base_url: &str) -> OllamaLanguageModel {
    let config = OllamaConfig {
        url: Url::parse(base_url).unwrap(),
        model: MODEL.to_owned(),
    };

    OllamaLanguageModel::new(&config)
}
