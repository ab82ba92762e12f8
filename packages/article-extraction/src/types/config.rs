//! Configuration types for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

/// Which prompt/reply contract the pipeline speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyFormat {
    /// One JSON object embedded in the reply (canonical).
    #[default]
    Json,

    /// Markdown table for classification, `P:`/`I:`/`C:`/`O:` lines for PICO.
    ///
    /// Kept for models that were prompted with the older templates.
    Legacy,
}

impl std::str::FromStr for ReplyFormat {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "legacy" => Ok(Self::Legacy),
            other => Err(ExtractionError::Config(format!(
                "unknown reply format: {other} (expected json or legacy)"
            ))),
        }
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of articles in flight at once.
    ///
    /// Each article runs its two prompts back-to-back, so this is also the
    /// bound on concurrent model calls. Default: 1 (strictly sequential).
    pub concurrency: usize,

    /// Prompt/reply contract. Default: JSON.
    #[serde(default)]
    pub reply_format: ReplyFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            reply_format: ReplyFormat::Json,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of articles processed concurrently.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the reply format.
    pub fn with_reply_format(mut self, format: ReplyFormat) -> Self {
        self.reply_format = format;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ExtractionError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
