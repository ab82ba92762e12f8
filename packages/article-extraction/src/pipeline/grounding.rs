//! Grounding of model-asserted labels against the source record.
//!
//! A technology label survives only if it literally appears in the record's
//! title or abstract. This holds for vocabulary labels and free-form labels
//! alike, so the model cannot introduce technologies the record never
//! mentions.

use serde_json::Value;
use tracing::debug;

use crate::types::classification::NONE;

/// Normalize a reply value into a list of candidate labels.
///
/// - a string is split on commas
/// - a list keeps its string elements
/// - anything else (missing, number, object) yields no candidates
///
/// Every candidate is trimmed; empty candidates are dropped.
pub fn normalize_candidates(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<&str> = match value {
        Some(Value::String(s)) => s.split(',').collect(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep candidates whose lower-cased text occurs in the lower-cased source.
///
/// Order follows the candidates. An empty result becomes `["None"]`.
pub fn filter_grounded(candidates: Vec<String>, source_text: &str) -> Vec<String> {
    let haystack = source_text.to_lowercase();

    let (grounded, dropped): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| haystack.contains(&c.to_lowercase()));

    if !dropped.is_empty() {
        debug!(dropped = ?dropped, "Dropped ungrounded candidates");
    }

    if grounded.is_empty() {
        vec![NONE.to_string()]
    } else {
        grounded
    }
}
