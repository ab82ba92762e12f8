//! Article records parsed from a bibliographic export.

use serde::{Deserialize, Serialize};

/// Title used when a record has no `TI` field content.
pub const NO_TITLE: &str = "No title";

/// Abstract used when a record has no `AB` field.
pub const NO_ABSTRACT: &str = "No abstract";

/// Year or identifier used when the field is missing or malformed.
pub const UNKNOWN: &str = "Unknown";

/// One article, as parsed from a single export block.
///
/// Records are created once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Title text, possibly spanning several lines
    pub title: String,

    /// Abstract text
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Four-digit publication year or `"Unknown"`
    pub year: String,

    /// `WOS:<digits>` accession token (max 19 chars) or `"Unknown"`
    pub identifier: String,
}

impl ArticleRecord {
    /// Create a record from already-normalized fields.
    pub fn new(
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        year: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            year: year.into(),
            identifier: identifier.into(),
        }
    }

    /// Text that model-asserted technologies are grounded against.
    pub fn grounding_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }

    /// Title with every whitespace run collapsed to one space.
    pub fn clean_title(&self) -> String {
        self.title.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title_collapses_whitespace() {
        let record = ArticleRecord::new(
            "Effects of GPS\n   tracking  on\tsoccer ",
            NO_ABSTRACT,
            UNKNOWN,
            UNKNOWN,
        );
        assert_eq!(record.clean_title(), "Effects of GPS tracking on soccer");
    }

    #[test]
    fn test_grounding_text_joins_title_and_abstract() {
        let record = ArticleRecord::new("Title", "Abstract body", "2020", UNKNOWN);
        assert_eq!(record.grounding_text(), "Title Abstract body");
    }
}
