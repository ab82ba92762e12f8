//! Classification results and the output row handed to persistence.

use serde::{Deserialize, Serialize};

use super::record::ArticleRecord;

/// Sentinel for "no classification".
pub const NONE: &str = "None";

/// Result of the sport/technology phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// One canonical sport label or `"None"`
    pub sport: String,

    /// Grounded technologies in model order, or `["None"]`
    pub technologies: Vec<String>,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self {
            sport: NONE.to_string(),
            technologies: vec![NONE.to_string()],
        }
    }
}

/// Result of the PICO phase (population and outcomes only).
///
/// Values are taken from the model as returned; only absence is defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PicoResult {
    pub population: String,
    pub outcomes: Vec<String>,
}

impl Default for PicoResult {
    fn default() -> Self {
        Self {
            population: NONE.to_string(),
            outcomes: vec![NONE.to_string()],
        }
    }
}

/// One processed article: the record merged with both phase results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub identifier: String,
    /// Whitespace-normalized title
    pub title: String,
    pub year: String,
    pub sport: String,
    pub population: String,
    pub technology: Vec<String>,
    pub outcome: Vec<String>,
}

impl OutputRow {
    /// Column order of the serialized row.
    pub const COLUMNS: [&'static str; 7] = [
        "identifier",
        "title",
        "year",
        "sport",
        "population",
        "technology",
        "outcome",
    ];

    /// Merge a record with its two phase results.
    pub fn new(record: &ArticleRecord, classification: ClassificationResult, pico: PicoResult) -> Self {
        Self {
            identifier: record.identifier.clone(),
            title: record.clean_title(),
            year: record.year.clone(),
            sport: classification.sport,
            population: pico.population,
            technology: classification.technologies,
            outcome: pico.outcomes,
        }
    }

    /// Flatten into the serialized schema, list fields as JSON array literals.
    pub fn to_serialized(&self) -> SerializedRow {
        SerializedRow {
            identifier: self.identifier.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            sport: self.sport.clone(),
            population: self.population.clone(),
            technology: json_array_literal(&self.technology),
            outcome: json_array_literal(&self.outcome),
        }
    }
}

/// Flat row with every field a string, in [`OutputRow::COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedRow {
    pub identifier: String,
    pub title: String,
    pub year: String,
    pub sport: String,
    pub population: String,
    pub technology: String,
    pub outcome: String,
}

impl SerializedRow {
    /// Field values in column order.
    pub fn values(&self) -> [&str; 7] {
        [
            &self.identifier,
            &self.title,
            &self.year,
            &self.sport,
            &self.population,
            &self.technology,
            &self.outcome,
        ]
    }
}

fn json_array_literal(items: &[String]) -> String {
    // Serializing a slice of strings cannot fail
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
