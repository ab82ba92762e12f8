//! Typed errors for the article extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Only conditions that abort a batch live here. Missing fields, unparseable
//! replies, unknown labels and ungrounded technologies are recovered in place
//! and never surface as errors.

use thiserror::Error;

/// Errors that can occur while running the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The model-serving collaborator failed (transport, HTTP status, empty body).
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// JSON parsing error (vocabulary documents)
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,
}

impl ExtractionError {
    /// Wrap any error coming out of a model client.
    pub fn model(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Model(err.into())
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
