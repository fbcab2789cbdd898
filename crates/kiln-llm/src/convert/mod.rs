//! Conversion between caller-facing types and the Ollama wire format
//!
//! `normalize` flattens prompts into chat messages; `ollama` turns replies
//! back into responses.

pub mod normalize;
pub mod ollama;

pub use normalize::normalize;
