//! Vocabulary validation for single-label answers.

use tracing::debug;

use crate::types::{classification::NONE, vocabulary::ControlledVocabulary};

/// Coerce a model-supplied sport into a canonical label or `"None"`.
///
/// Matching is exact and case-sensitive: `"soccer"` does not match
/// `"Soccer"`. Anything outside the vocabulary is treated as no
/// classification rather than passed through.
pub fn validate_sport(value: &str, sports: &ControlledVocabulary) -> String {
    if value == NONE {
        return NONE.to_string();
    }

    if sports.contains(value) {
        return value.to_string();
    }

    debug!(sport = value, "Sport not in vocabulary, discarding");
    NONE.to_string()
}
