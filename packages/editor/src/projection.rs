//! # Field Projection
//!
//! Turns a graph node's rows into what the detail view shows and edits:
//! a display string and a flat map of draft field text.
//!
//! Container rows (`object`/`array`) appear in neither. Editing a nested
//! container goes through that container's own node.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coercion::{display_text, field_text};
use crate::document::to_canonical_text;
use crate::EditorConfig;

/// Key of the single synthetic field that stands for "the value itself"
pub const VALUE_FIELD: &str = "";

/// Draft text per field key, in row order
pub type EditableFieldSet = IndexMap<String, String>;

/// JSON type of a row's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl RowType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => RowType::Null,
            Value::Bool(_) => RowType::Boolean,
            Value::Number(_) => RowType::Number,
            Value::String(_) => RowType::String,
            Value::Array(_) => RowType::Array,
            Value::Object(_) => RowType::Object,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, RowType::Object | RowType::Array)
    }
}

/// One displayable row of a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRow {
    pub key: Option<String>,

    /// Scalar value; omitted for container rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(rename = "type")]
    pub row_type: RowType,
}

impl NodeRow {
    /// Row holding a scalar value
    pub fn scalar(key: Option<String>, value: Value) -> Self {
        Self {
            key,
            row_type: RowType::of(&value),
            value: Some(value),
        }
    }

    /// Row standing for a nested object or array
    pub fn container(key: Option<String>, row_type: RowType) -> Self {
        Self {
            key,
            value: None,
            row_type,
        }
    }

    pub fn is_container(&self) -> bool {
        self.row_type.is_container()
    }
}

/// Output of projecting a node's rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub display: String,
    pub fields: EditableFieldSet,
}

impl Projection {
    /// True when the fields are the single synthetic value field
    pub fn is_single_value(&self) -> bool {
        self.fields.len() == 1 && self.fields.contains_key(VALUE_FIELD)
    }
}

/// Pure projection of node rows, parameterised by display settings
#[derive(Debug, Clone)]
pub struct FieldProjector {
    indent_width: usize,
    empty_display: String,
}

impl FieldProjector {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            indent_width: config.indent_width,
            empty_display: config.empty_display.clone(),
        }
    }

    pub fn project(&self, rows: &[NodeRow]) -> Projection {
        let projection = Projection {
            display: self.display(rows),
            fields: self.fields(rows),
        };
        tracing::debug!(
            rows = rows.len(),
            fields = projection.fields.len(),
            single_value = projection.is_single_value(),
            "projected node rows"
        );
        projection
    }

    fn display(&self, rows: &[NodeRow]) -> String {
        match rows {
            [] => self.empty_display.clone(),
            [NodeRow { key: None, value, .. }] => {
                value.as_ref().map(display_text).unwrap_or_default()
            }
            rows => {
                let object: Map<String, Value> = rows
                    .iter()
                    .filter(|row| !row.is_container())
                    .map(|row| {
                        (
                            row.key.clone().unwrap_or_default(),
                            row.value.clone().unwrap_or(Value::Null),
                        )
                    })
                    .collect();
                let object = Value::Object(object);

                // Serializing a Value into memory does not fail
                to_canonical_text(&object, self.indent_width)
                    .unwrap_or_else(|_| object.to_string())
            }
        }
    }

    fn fields(&self, rows: &[NodeRow]) -> EditableFieldSet {
        if let [row @ NodeRow { key: None, .. }] = rows {
            let mut fields = EditableFieldSet::new();
            if !row.is_container() {
                fields.insert(VALUE_FIELD.to_string(), field_text(row.value.as_ref()));
            }
            return fields;
        }

        rows.iter()
            .filter(|row| !row.is_container())
            .filter_map(|row| match &row.key {
                Some(key) if !key.is_empty() => {
                    Some((key.clone(), field_text(row.value.as_ref())))
                }
                _ => None,
            })
            .collect()
    }
}

impl Default for FieldProjector {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

/// Project rows with the default display settings
pub fn project(rows: &[NodeRow]) -> Projection {
    FieldProjector::default().project(rows)
}
