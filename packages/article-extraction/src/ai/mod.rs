//! Model implementations for the extraction library.
//!
//! This module provides reference implementations of the `LanguageModel`
//! trait. Users can use these directly or implement their own.

mod rate_limited;

#[cfg(feature = "openai")]
mod openai;

pub use rate_limited::{LanguageModelExt, RateLimitedModel};

#[cfg(feature = "openai")]
pub use openai::{OpenAiChat, OLLAMA_BASE_URL};
