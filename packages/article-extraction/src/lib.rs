//! Article Classification Library
//!
//! Turns a field-tagged bibliographic export (Web of Science style) into one
//! classified row per article by asking a language model two questions per
//! record: which sport and technologies it covers, and its PICO population
//! and outcomes.
//!
//! # Design Philosophy
//!
//! **"Trust the record, not the model"**
//!
//! - Sport labels must be in the controlled vocabulary, exactly as written
//! - Technology labels must literally appear in the title or abstract
//! - Unreadable replies degrade to `"None"`, they are never retried
//! - A failing model call aborts the batch
//!
//! # Usage
//!
//! ```rust,ignore
//! use article_extraction::{Pipeline, PipelineConfig, Vocabularies};
//! use article_extraction::testing::MockModel;
//!
//! let model = MockModel::new()
//!     .with_classification_reply("GPS", r#"{"sport": "Soccer", "technology": "GPS"}"#);
//!
//! let pipeline = Pipeline::with_config(
//!     model,
//!     Vocabularies::builtin(),
//!     PipelineConfig::new().with_concurrency(4),
//! );
//! let rows = pipeline.run(&export_text).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The `LanguageModel` boundary
//! - [`types`] - Records, vocabularies, results and configuration
//! - [`pipeline`] - Parsing, prompting, reply interpretation, orchestration
//! - [`ai`] - Model implementations (OpenAI-compatible client, rate limiting)
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractionError, Result};
pub use pipeline::{
    parse_records, JsonObjectInterpreter, LabelledLineInterpreter, MarkdownTableInterpreter,
    Pipeline, ReplyInterpreter,
};
pub use traits::model::LanguageModel;
pub use types::{
    classification::{ClassificationResult, OutputRow, PicoResult, SerializedRow},
    config::{PipelineConfig, ReplyFormat},
    record::ArticleRecord,
    reply::ExtractedReply,
    vocabulary::{ControlledVocabulary, Vocabularies},
};
