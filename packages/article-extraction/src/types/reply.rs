//! Structured view of a free-text model reply.

use serde_json::{Map, Value};

/// What a reply interpreter managed to pull out of a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedReply {
    /// A structured mapping was found
    Present(Map<String, Value>),

    /// Nothing usable was found
    Absent,
}

impl ExtractedReply {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Raw value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Present(map) => map.get(key),
            Self::Absent => None,
        }
    }

    /// String value for a key; non-string values count as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The mapping, empty when absent.
    pub fn into_map(self) -> Map<String, Value> {
        match self {
            Self::Present(map) => map,
            Self::Absent => Map::new(),
        }
    }
}

impl From<Option<Map<String, Value>>> for ExtractedReply {
    fn from(map: Option<Map<String, Value>>) -> Self {
        map.map_or(Self::Absent, Self::Present)
    }
}
