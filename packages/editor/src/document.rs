//! # Document Handle
//!
//! Canonical JSON text and the stores it is published to.
//!
//! The document text store is the single source of truth. Edits never touch
//! it directly: the pipeline reads the text, parses a working [`Document`],
//! mutates that copy and publishes the re-serialized result.
//!
//! ## Lifecycle
//!
//! ```text
//! Read text → Parse → Mutate → Serialize → Publish
//!     ↓         ↓        ↓          ↓          ↓
//!   Store     Value   Mutation   Canonical  Store + Buffer
//! ```

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::coercion::normalize_numbers;
use crate::mutations::{CommitOutcome, Mutation, MutationError};

/// Serialize `value` as pretty JSON indented by `indent_width` spaces
pub fn to_canonical_text(value: &Value, indent_width: usize) -> Result<String, serde_json::Error> {
    let indent = vec![b' '; indent_width];
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut serializer)?;

    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Working copy of the document value
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: Value,
}

impl Document {
    /// Parse document text, storing integral floats as integers
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        let mut value = serde_json::from_str(text)?;
        normalize_numbers(&mut value);
        Ok(Self { value })
    }

    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Apply a mutation in place
    pub fn apply(&mut self, mutation: &Mutation) -> Result<CommitOutcome, MutationError> {
        mutation.apply(&mut self.value)
    }

    /// Canonical text of the current value
    pub fn to_text(&self, indent_width: usize) -> Result<String, serde_json::Error> {
        to_canonical_text(&self.value, indent_width)
    }
}

/// Store holding the authoritative document text
pub trait DocumentTextStore {
    fn document_text(&self) -> String;

    fn set_document_text(&mut self, text: String);
}

/// Raw content buffer of the paired text editor
pub trait ContentBuffer {
    fn set_contents(&mut self, text: &str);
}

/// In-memory document text store
#[derive(Debug, Clone, Default)]
pub struct MemoryTextStore {
    text: String,
}

impl MemoryTextStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentTextStore for MemoryTextStore {
    fn document_text(&self) -> String {
        self.text.clone()
    }

    fn set_document_text(&mut self, text: String) {
        self.text = text;
    }
}

/// In-memory content buffer that counts publications
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    contents: String,
    updates: usize,
}

impl MemoryBuffer {
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Number of times contents were set
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl ContentBuffer for MemoryBuffer {
    fn set_contents(&mut self, text: &str) {
        self.contents = text.to_string();
        self.updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructuralPath;
    use serde_json::json;

    #[test]
    fn test_canonical_text_two_space() {
        let text = to_canonical_text(&json!({"user": {"age": 30}}), 2).unwrap();
        assert_eq!(text, "{\n  \"user\": {\n    \"age\": 30\n  }\n}");
    }

    #[test]
    fn test_canonical_text_preserves_key_order() {
        let doc = Document::from_text(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(doc.to_text(0).unwrap(), "{\n\"z\": 1,\n\"a\": 2,\n\"m\": 3\n}");
    }

    #[test]
    fn test_canonical_text_scalar_root() {
        assert_eq!(to_canonical_text(&json!("hi"), 2).unwrap(), "\"hi\"");
        assert_eq!(to_canonical_text(&json!([]), 2).unwrap(), "[]");
    }

    #[test]
    fn test_document_from_invalid_text() {
        assert!(Document::from_text("{ nope").is_err());
    }

    #[test]
    fn test_document_apply() {
        let mut doc = Document::from_text("[1, 2, 3]").unwrap();
        let mutation = Mutation::SetValue {
            path: StructuralPath::root().index(1),
            raw: "99".to_string(),
        };

        let outcome = doc.apply(&mutation).unwrap();
        assert_eq!(outcome, CommitOutcome::Applied);
        assert_eq!(doc.value(), &json!([1, 99, 3]));
    }

    #[test]
    fn test_memory_stores() {
        let mut store = MemoryTextStore::new("{}");
        assert_eq!(store.document_text(), "{}");
        store.set_document_text("[]".to_string());
        assert_eq!(store.document_text(), "[]");

        let mut buffer = MemoryBuffer::default();
        assert_eq!(buffer.updates(), 0);
        buffer.set_contents("[]");
        assert_eq!(buffer.contents(), "[]");
        assert_eq!(buffer.updates(), 1);
    }
}
