//! # jsongraph Editor
//!
//! Path-addressed mutation engine behind the JSON graph view.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: canonical JSON text ⇄ value       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ graph: value → nodes of rows, with paths    │
//! │ projection: rows → display + field drafts   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: Viewing ⇄ Editing                  │
//! │ mutations: path → slot → coerced write      │
//! │ pipeline: read → mutate → serialize →       │
//! │           publish (text store + buffer)     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Text is source of truth**: the graph is re-derived after every publish
//! 2. **All or nothing**: a failed edit publishes nothing
//! 3. **Single writer**: only the pipeline writes the stores
//! 4. **Total coercion**: every draft string has a typed value
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jsongraph_editor::{EditSession, EditorConfig, MemoryBuffer, MemoryTextStore, Pipeline};
//!
//! let store = MemoryTextStore::new(r#"{"user":{"age":30}}"#);
//! let mut pipeline = Pipeline::new(store, MemoryBuffer::default(), EditorConfig::default())?;
//!
//! let node = pipeline.graph().node_at(&"$[\"user\"]".parse()?).unwrap().id.clone();
//! pipeline.select(&node)?;
//!
//! let mut session = EditSession::open_selected(&pipeline, pipeline.projector())?;
//! session.begin_edit(pipeline.graph());
//! session.set_field("age", "31")?;
//! session.save(&mut pipeline)?;
//! ```

mod coercion;
mod config;
mod document;
mod errors;
mod graph;
mod mutations;
mod path;
mod pipeline;
mod projection;
mod session;

pub use coercion::{coerce, display_text, field_text, normalize_numbers};
pub use config::{EditorConfig, CONFIG_FILE_NAME};
pub use document::{
    to_canonical_text, ContentBuffer, Document, DocumentTextStore, MemoryBuffer, MemoryTextStore,
};
pub use errors::EditorError;
pub use graph::{GraphEdge, GraphModel, GraphNode};
pub use mutations::{commit, commit_scalar, CommitOutcome, Mutation, MutationError, Target};
pub use path::{lookup, resolve, PathParseError, PathSegment, ResolveError, Slot, StructuralPath};
pub use pipeline::{Pipeline, PipelineResult, SelectedNode, SelectionProvider};
pub use projection::{
    project, EditableFieldSet, FieldProjector, NodeRow, Projection, RowType, VALUE_FIELD,
};
pub use session::{EditSession, SessionState};

// Re-export the value type so callers don't need a direct serde_json dependency
pub use serde_json::Value as DocumentValue;
