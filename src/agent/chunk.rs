//! Streamed agent output chunks.

use serde_json::{Map, Value};

/// One unit of the agent's streamed output.
///
/// A chunk is a loose JSON mapping. Only a string-valued `"output"` field
/// carries a displayable snapshot; anything else (intermediate reasoning,
/// progress markers, foreign fields) is carried but never displayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentChunk {
    fields: Map<String, Value>,
}

impl AgentChunk {
    /// Wrap a decoded JSON value. Non-object values become empty chunks.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// A chunk carrying a cumulative answer snapshot.
    pub fn output(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("output".to_string(), Value::String(text.into()));
        Self { fields }
    }

    /// The cumulative answer snapshot, if this chunk carries one.
    ///
    /// A missing or non-string `"output"` field means "no update",
    /// never an error.
    pub fn output_text(&self) -> Option<&str> {
        self.fields.get("output").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_chunk() {
        let chunk = AgentChunk::output("hello");
        assert_eq!(chunk.output_text(), Some("hello"));
    }

    #[test]
    fn test_empty_chunk_has_no_output() {
        let chunk = AgentChunk::from_value(json!({}));
        assert_eq!(chunk.output_text(), None);
    }

    #[test]
    fn test_non_string_output_is_no_update() {
        let chunk = AgentChunk::from_value(json!({"output": 7}));
        assert_eq!(chunk.output_text(), None);
    }

    #[test]
    fn test_foreign_fields_are_ignored() {
        let chunk = AgentChunk::from_value(json!({"thinking": "hmm", "output": "done"}));
        assert_eq!(chunk.output_text(), Some("done"));
    }

    #[test]
    fn test_non_object_value_is_empty() {
        let chunk = AgentChunk::from_value(json!("bare string"));
        assert_eq!(chunk.output_text(), None);
    }
}
