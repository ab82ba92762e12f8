//! Record parser for field-tagged bibliographic exports.
//!
//! An export is a run of records, each closed by an `ER` line (normally
//! followed by a blank line). Inside a record every field starts on a line
//! with a two-character tag and a space:
//!
//! ```text
//! TI Effects of GPS tracking on soccer
//!    performance
//! AB This study examines ...
//! PY 2021
//! UT WOS:000123456789012
//! ER
//! ```
//!
//! Continuation lines belong to the field above them until the next tag
//! line (two uppercase letters and a space), a blank line, or the end of the
//! record.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::record::{ArticleRecord, NO_ABSTRACT, NO_TITLE, UNKNOWN};

/// End-of-record marker line.
pub const END_OF_RECORD: &str = "ER";

/// Longest accepted accession token, `WOS:` included.
pub const MAX_IDENTIFIER_LEN: usize = 19;

const TITLE_TAG: &str = "TI";
const ABSTRACT_TAG: &str = "AB";
const YEAR_TAG: &str = "PY";
const IDENTIFIER_TAG: &str = "UT";

static WOS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"WOS:\d+").expect("valid accession pattern"));

/// Parse raw export text into article records, in input order.
///
/// Blocks without a `TI` line produce no record. Parsing is a pure function
/// of the input.
pub fn parse_records(raw: &str) -> Vec<ArticleRecord> {
    let records: Vec<_> = split_blocks(raw)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect();

    debug!(records = records.len(), "Parsed export text");
    records
}

/// Split text into per-record line blocks at `ER` lines.
fn split_blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in raw.lines() {
        if line.trim_end() == END_OF_RECORD {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }

    if current.iter().any(|l| !l.trim().is_empty()) {
        blocks.push(current);
    }

    blocks
}

fn parse_block(lines: &[&str]) -> Option<ArticleRecord> {
    if !lines.iter().any(|line| has_tag(line, TITLE_TAG)) {
        return None;
    }

    let title = field(lines, TITLE_TAG).unwrap_or_else(|| NO_TITLE.to_string());
    let abstract_text = field(lines, ABSTRACT_TAG).unwrap_or_else(|| NO_ABSTRACT.to_string());
    let year = field(lines, YEAR_TAG)
        .filter(|y| is_year(y))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let identifier = field(lines, IDENTIFIER_TAG)
        .map(|raw| normalize_identifier(&raw))
        .unwrap_or_else(|| UNKNOWN.to_string());

    Some(ArticleRecord {
        title,
        abstract_text,
        year,
        identifier,
    })
}

/// Content of the first `tag` field, continuation lines included, trimmed.
fn field(lines: &[&str], tag: &str) -> Option<String> {
    let start = lines.iter().position(|line| has_tag(line, tag))?;

    let mut content = vec![&lines[start][tag.len() + 1..]];
    content.extend(
        lines[start + 1..]
            .iter()
            .take_while(|line| !is_tag_line(line) && !line.trim().is_empty()),
    );

    let joined = content.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `line` opens a `tag` field (tag at line start, then a space).
fn has_tag(line: &str, tag: &str) -> bool {
    line.strip_prefix(tag)
        .is_some_and(|rest| rest.starts_with(' '))
}

/// Any field line: two uppercase ASCII letters, then a space.
///
/// Tags with digits (`C1`, `J9`) do not end a field.
fn is_tag_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_uppercase()
        && bytes[1].is_ascii_uppercase()
        && bytes[2] == b' '
}

fn is_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Pull the `WOS:<digits>` token out of raw identifier text.
///
/// The token is capped at [`MAX_IDENTIFIER_LEN`] characters. Any Unicode
/// decimal digit counts. Text without a token normalizes to `"Unknown"`.
pub fn normalize_identifier(raw: &str) -> String {
    match WOS_TOKEN.find(raw) {
        Some(token) => token.as_str().chars().take(MAX_IDENTIFIER_LEN).collect(),
        None => UNKNOWN.to_string(),
    }
}
