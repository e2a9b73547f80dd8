//! # Document Mutations
//!
//! Path-addressed writes driven by editor drafts.
//!
//! ## Mutation Semantics
//!
//! ### SetFields
//! - Target is an object: each draft field is coerced and written as a
//!   member. Members without a draft are kept, new keys are created.
//! - Any other target: the first draft field (or `""`) replaces the whole
//!   addressed value.
//!
//! ### SetValue
//! - Replaces the whole addressed value with the coerced text.
//! - Skipped when the current scalar already reads the same.
//!
//! Both resolve the path before writing anything: a stale path leaves the
//! document untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::coercion::{coerce, display_text};
use crate::path::{resolve, ResolveError, Slot, StructuralPath};
use crate::projection::EditableFieldSet;

/// Edits submitted by the node and detail editors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    /// Write a group of draft fields (detail editor)
    SetFields {
        path: StructuralPath,
        fields: EditableFieldSet,
    },

    /// Replace a single value (inline node editor)
    SetValue { path: StructuralPath, raw: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Whether a mutation changed the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// Nothing to write; the document is unchanged
    Unchanged,
}

/// Shape of the value a resolved slot holds
#[derive(Debug)]
pub enum Target<'s> {
    /// Non-array object: edited member by member
    Container(&'s mut Map<String, Value>),
    /// Anything else, including a slot with no value yet: replaced whole
    Scalar(Option<&'s Value>),
}

impl<'s> Target<'s> {
    pub fn of(slot: &'s mut Slot<'_>) -> Self {
        match slot.current_mut() {
            Some(Value::Object(map)) => Target::Container(map),
            other => Target::Scalar(other.map(|value| &*value)),
        }
    }
}

impl Mutation {
    pub fn path(&self) -> &StructuralPath {
        match self {
            Mutation::SetFields { path, .. } | Mutation::SetValue { path, .. } => path,
        }
    }

    /// Apply mutation to a document value
    pub fn apply(&self, doc: &mut Value) -> Result<CommitOutcome, MutationError> {
        match self {
            Mutation::SetFields { path, fields } => commit(doc, path, fields),
            Mutation::SetValue { path, raw } => commit_scalar(doc, path, raw),
        }
    }
}

/// Write draft fields at `path`
pub fn commit(
    root: &mut Value,
    path: &StructuralPath,
    fields: &EditableFieldSet,
) -> Result<CommitOutcome, MutationError> {
    let mut slot = resolve(root, path)?;

    match Target::of(&mut slot) {
        Target::Container(map) => {
            for (key, raw) in fields {
                map.insert(key.clone(), coerce(raw));
            }
            tracing::debug!(%path, fields = fields.len(), "wrote field map");
        }
        Target::Scalar(_) => {
            let raw = fields.values().next().map(String::as_str).unwrap_or("");
            slot.replace(coerce(raw));
            tracing::debug!(%path, "replaced value from first field");
        }
    }

    Ok(CommitOutcome::Applied)
}

/// Replace the value at `path` with coerced `raw` text
pub fn commit_scalar(
    root: &mut Value,
    path: &StructuralPath,
    raw: &str,
) -> Result<CommitOutcome, MutationError> {
    let slot = resolve(root, path)?;
    let value = coerce(raw);

    if is_same_scalar(slot.current(), &value) {
        tracing::debug!(%path, "value unchanged, skipping write");
        return Ok(CommitOutcome::Unchanged);
    }

    slot.replace(value);
    tracing::debug!(%path, "replaced value");
    Ok(CommitOutcome::Applied)
}

/// Scalars compare by their string form; containers never match
fn is_same_scalar(current: Option<&Value>, proposed: &Value) -> bool {
    match current {
        None | Some(Value::Object(_)) | Some(Value::Array(_)) => false,
        Some(current) => display_text(current) == display_text(proposed),
    }
}
