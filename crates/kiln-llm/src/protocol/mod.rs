//! Wire format types for the inference server
//!
//! These mirror the server's JSON exactly; conversion to caller-facing types
//! lives in `convert`.

pub mod ollama;
