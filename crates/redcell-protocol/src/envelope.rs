use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic push envelope: `{"type": <tag>, "data": {...}, "turn_number"?: n}`.
///
/// The tag space is open-ended; decoding into a typed per-domain message is
/// the reducer side's concern and unknown tags must survive untouched here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEnvelope {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_number: Option<u32>,
}

impl StreamEnvelope {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            data: Map::new(),
            turn_number: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        if let Value::Object(map) = data {
            self.data = map;
        }
        self
    }

    pub fn with_turn_number(mut self, turn_number: u32) -> Self {
        self.turn_number = Some(turn_number);
        self
    }

    /// Parses one newline-delimited frame. Blank and malformed lines decode
    /// to `None` and are dropped by the caller.
    pub fn parse_line(line: &[u8]) -> Option<Self> {
        let line = std::str::from_utf8(line).ok()?.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }

    pub fn normalized_tag(&self) -> String {
        self.tag.to_ascii_lowercase()
    }

    /// Lowers the `data` mapping into a flat all-optional field struct.
    /// Any shape mismatch falls back to the struct's defaults rather than
    /// failing the reduction.
    pub fn data_fields<T>(&self) -> T
    where
        T: DeserializeOwned + Default,
    {
        serde_json::from_value(Value::Object(self.data.clone())).unwrap_or_default()
    }
}
