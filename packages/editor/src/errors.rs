//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Path error: {0}")]
    Path(#[from] crate::path::PathParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("No node selected")]
    NoSelection,

    #[error("Unknown field: {0:?}")]
    UnknownField(String),

    #[error("Session is not editing")]
    NotEditing,

    #[error("Invalid config: {0}")]
    Config(String),
}
