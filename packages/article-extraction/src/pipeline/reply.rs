//! Reply interpreters - best-effort structured extraction from model replies.
//!
//! A model reply is free text that is expected to carry a structured answer
//! somewhere inside it. Interpreters never fail: anything they cannot read
//! becomes [`ExtractedReply::Absent`] and the caller falls back to defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::reply::ExtractedReply;

/// First `{`, then the nearest `}` after it.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("valid object pattern"));

/// `| short title | {Sport} | ...`
static TABLE_SPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|\s*.+?\s*\|\s*\{(.+?)\}\s*\|").expect("valid sport pattern")
});

/// `| short title | {Sport} | 2021 | technologies |`
static TABLE_TECHNOLOGY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|\s*.+?\s*\|\s*\{.+?\}\s*\|\s*\d{4}\s*\|\s*(.+?)\s*\|")
        .expect("valid technology pattern")
});

/// `P: ...` style lines, label case-insensitive.
static PICO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*#-]*([PICO])\s*:(.*)$").expect("valid PICO pattern")
});

/// Turns a model reply into an [`ExtractedReply`].
pub trait ReplyInterpreter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Interpret a reply. Never fails; unreadable replies are `Absent`.
    fn interpret(&self, reply: &str) -> ExtractedReply;
}

/// Parse the first embedded JSON object in `reply`.
///
/// Returns `Absent` when there is no `{...}` span or the span is not a JSON
/// object.
pub fn extract_json(reply: &str) -> ExtractedReply {
    let Some(span) = JSON_OBJECT.find(reply) else {
        debug!("No JSON object in reply");
        return ExtractedReply::Absent;
    };

    match serde_json::from_str::<Map<String, Value>>(span.as_str()) {
        Ok(map) => ExtractedReply::Present(map),
        Err(e) => {
            debug!(error = %e, "Embedded JSON object did not parse");
            ExtractedReply::Absent
        }
    }
}

/// Canonical interpreter: one JSON object embedded in prose.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonObjectInterpreter;

impl ReplyInterpreter for JsonObjectInterpreter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn interpret(&self, reply: &str) -> ExtractedReply {
        extract_json(reply)
    }
}

/// Legacy classification interpreter for markdown-table replies.
///
/// Reads the sport from the `{braced}` second column and the technology list
/// from the fourth column. Produces `sport` and `technology` keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownTableInterpreter;

impl ReplyInterpreter for MarkdownTableInterpreter {
    fn name(&self) -> &'static str {
        "markdown-table"
    }

    fn interpret(&self, reply: &str) -> ExtractedReply {
        let mut map = Map::new();

        if let Some(sport) = TABLE_SPORT.captures(reply).and_then(|c| c.get(1)) {
            map.insert("sport".into(), Value::String(sport.as_str().trim().to_string()));
        }

        if let Some(technology) = TABLE_TECHNOLOGY.captures(reply).and_then(|c| c.get(1)) {
            let cleaned = strip_braces(technology.as_str());
            map.insert("technology".into(), Value::String(cleaned));
        }

        if map.is_empty() {
            ExtractedReply::Absent
        } else {
            ExtractedReply::Present(map)
        }
    }
}

/// Legacy PICO interpreter for `P:`/`I:`/`C:`/`O:` lines.
///
/// Braces and `None` placeholders are stripped; empty components are left
/// out so callers apply their own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelledLineInterpreter;

impl ReplyInterpreter for LabelledLineInterpreter {
    fn name(&self) -> &'static str {
        "labelled-lines"
    }

    fn interpret(&self, reply: &str) -> ExtractedReply {
        let mut map = Map::new();

        for captures in PICO_LINE.captures_iter(reply) {
            let key = match captures[1].to_ascii_uppercase().as_str() {
                "P" => "population",
                "I" => "intervention",
                "C" => "comparison",
                _ => "outcome",
            };
            // First occurrence of each label wins
            if map.contains_key(key) {
                continue;
            }

            let value = strip_braces(&captures[2]).replace("None", "");
            let value = value.trim_matches(|c: char| c.is_whitespace() || c == '*');
            if !value.is_empty() {
                map.insert(key.into(), Value::String(value.to_string()));
            }
        }

        if map.is_empty() {
            ExtractedReply::Absent
        } else {
            ExtractedReply::Present(map)
        }
    }
}

fn strip_braces(value: &str) -> String {
    value.replace(['{', '}'], "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_json_from_prose() {
        let reply = extract_json(r#"blah {"sport":"Soccer","technology":"GPS"} blah"#);
        assert_eq!(
            reply,
            ExtractedReply::Present(
                json!({"sport": "Soccer", "technology": "GPS"})
                    .as_object()
                    .cloned()
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_extract_json_no_object() {
        assert_eq!(extract_json("no json here"), ExtractedReply::Absent);
        assert!(extract_json("no json here").into_map().is_empty());
    }

    #[test]
    fn test_extract_json_invalid_object() {
        assert_eq!(extract_json("{sport: Soccer}"), ExtractedReply::Absent);
    }

    #[test]
    fn test_extract_json_first_object_wins() {
        let reply = extract_json(r#"{"sport":"Rugby"} and later {"sport":"Soccer"}"#);
        assert_eq!(reply.get_str("sport"), Some("Rugby"));
    }

    #[test]
    fn test_extract_json_multiline_with_array() {
        let reply = extract_json(
            "Here you go:\n```json\n{\n  \"sport\": \"Tennis\",\n  \"technology\": [\"IMU\", \"EMG\"]\n}\n```",
        );
        assert_eq!(reply.get_str("sport"), Some("Tennis"));
        assert_eq!(reply.get("technology"), Some(&json!(["IMU", "EMG"])));
    }

    #[test]
    fn test_extract_json_nested_object_is_absent() {
        // The scan stops at the first closing brace
        let reply = extract_json(r#"{"meta": {"a": 1}, "sport": "Golf"}"#);
        assert_eq!(reply, ExtractedReply::Absent);
    }

    #[test]
    fn test_markdown_table() {
        let reply = "| Short title | Sport | Year | Technology |\n|---|---|---|---|\n| GPS in soccer | {Soccer} | 2021 | {GPS}, Wearables |\n";
        let extracted = MarkdownTableInterpreter.interpret(reply);

        assert_eq!(extracted.get_str("sport"), Some("Soccer"));
        assert_eq!(extracted.get_str("technology"), Some("GPS, Wearables"));
    }

    #[test]
    fn test_markdown_table_without_row() {
        let extracted = MarkdownTableInterpreter.interpret("I could not classify this.");
        assert_eq!(extracted, ExtractedReply::Absent);
    }

    #[test]
    fn test_labelled_lines() {
        let reply = "### PICO Extraction ###\n\nP: Elite soccer players\nI: GPS tracking\nC: {None}\nO: Performance, Workload\n";
        let extracted = LabelledLineInterpreter.interpret(reply);

        assert_eq!(extracted.get_str("population"), Some("Elite soccer players"));
        assert_eq!(extracted.get_str("intervention"), Some("GPS tracking"));
        assert_eq!(extracted.get("comparison"), None);
        assert_eq!(extracted.get_str("outcome"), Some("Performance, Workload"));
    }

    #[test]
    fn test_labelled_lines_ignore_inline_labels() {
        let reply = "PICO: here it is\np: Youth\n- **O:** Speed";
        let extracted = LabelledLineInterpreter.interpret(reply);

        assert_eq!(extracted.get_str("population"), Some("Youth"));
        assert_eq!(extracted.get_str("outcome"), Some("Speed"));
    }

    #[test]
    fn test_labelled_lines_nothing_found() {
        assert_eq!(
            LabelledLineInterpreter.interpret("nothing useful"),
            ExtractedReply::Absent
        );
    }
}
