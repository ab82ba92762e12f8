//! Classification pipeline - the core of the library.
//!
//! The pipeline orchestrates, per article record:
//! - Parsing of the bibliographic export into records
//! - Classification prompt (sport, technologies)
//! - PICO prompt (population, outcomes)
//! - Reply interpretation, vocabulary validation and grounding

pub mod grounding;
pub mod parse;
pub mod prompts;
pub mod reply;
pub mod run;
pub mod validate;

pub use grounding::{filter_grounded, normalize_candidates};
pub use parse::{normalize_identifier, parse_records};
pub use prompts::{
    format_classification_prompt, format_pico_prompt, prompt_hash, prompt_hashes, PromptKind,
    CLASSIFICATION_PROMPT, LEGACY_CLASSIFICATION_PROMPT, LEGACY_PICO_PROMPT, PICO_PROMPT,
};
pub use reply::{
    extract_json, JsonObjectInterpreter, LabelledLineInterpreter, MarkdownTableInterpreter,
    ReplyInterpreter,
};
pub use run::Pipeline;
pub use validate::validate_sport;
