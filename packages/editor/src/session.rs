//! # Edit Session Management
//!
//! Tracks one node's edit state in the detail or inline editor.
//!
//! ```text
//! Viewing ──begin_edit──▶ Editing ──save (ok or err)──▶ Viewing
//!                            └─────cancel──────────────▶ Viewing
//! ```
//!
//! Drafts live only in the session. Saving is the sole path to the
//! document, and a save can only start from `Editing`, so two saves of the
//! same session never overlap.

use crate::document::{ContentBuffer, DocumentTextStore};
use crate::graph::GraphModel;
use crate::path::StructuralPath;
use crate::pipeline::{Pipeline, PipelineResult, SelectedNode, SelectionProvider};
use crate::projection::{EditableFieldSet, FieldProjector, NodeRow, Projection, VALUE_FIELD};
use crate::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Viewing,
    Editing,
}

/// Edit session for a single node
#[derive(Debug, Clone)]
pub struct EditSession {
    state: SessionState,
    path: StructuralPath,
    rows: Vec<NodeRow>,
    projection: Projection,
    draft: EditableFieldSet,
    projector: FieldProjector,
}

impl EditSession {
    /// Open a session on a node, in `Viewing`
    pub fn open(node: SelectedNode, projector: FieldProjector) -> Self {
        let projection = projector.project(&node.rows);
        Self {
            state: SessionState::Viewing,
            path: node.path,
            rows: node.rows,
            draft: projection.fields.clone(),
            projection,
            projector,
        }
    }

    /// Open a session on the currently selected node
    pub fn open_selected(
        provider: &impl SelectionProvider,
        projector: FieldProjector,
    ) -> Result<Self, EditorError> {
        let node = provider.selected_node().ok_or(EditorError::NoSelection)?;
        Ok(Self::open(node, projector))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == SessionState::Editing
    }

    pub fn path(&self) -> &StructuralPath {
        &self.path
    }

    /// Display text of the last authoritative rows
    pub fn display(&self) -> &str {
        &self.projection.display
    }

    pub fn draft(&self) -> &EditableFieldSet {
        &self.draft
    }

    /// Enter `Editing` with a draft taken from the current document.
    ///
    /// Already editing: the draft is kept as is.
    pub fn begin_edit(&mut self, graph: &GraphModel) {
        if self.is_editing() {
            return;
        }
        self.refresh(graph);
        self.state = SessionState::Editing;
    }

    /// Change one draft field
    pub fn set_field(&mut self, key: &str, text: impl Into<String>) -> Result<(), EditorError> {
        if !self.is_editing() {
            return Err(EditorError::NotEditing);
        }

        let slot = self
            .draft
            .get_mut(key)
            .ok_or_else(|| EditorError::UnknownField(key.to_string()))?;
        *slot = text.into();
        Ok(())
    }

    /// Set the value of a single-value node
    pub fn set_value(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        self.set_field(VALUE_FIELD, text)
    }

    /// Leave `Editing`, discarding the draft in favour of the document
    pub fn cancel(&mut self, graph: &GraphModel) {
        self.state = SessionState::Viewing;
        self.refresh(graph);
    }

    /// Commit the draft through the pipeline
    ///
    /// The session returns to `Viewing` whether or not the commit succeeds;
    /// on failure the document is untouched and the draft is reset from it.
    pub fn save<S, B>(&mut self, pipeline: &mut Pipeline<S, B>) -> Result<PipelineResult, EditorError>
    where
        S: DocumentTextStore,
        B: ContentBuffer,
    {
        if !self.is_editing() {
            return Err(EditorError::NotEditing);
        }
        self.state = SessionState::Viewing;

        let result = if self.projection.is_single_value() {
            let raw = self.draft.get(VALUE_FIELD).map(String::as_str).unwrap_or("");
            pipeline.commit_scalar(&self.path, raw)
        } else {
            pipeline.commit_fields(&self.path, &self.draft)
        };

        if let Err(error) = &result {
            tracing::warn!(path = %self.path, %error, "save failed, document left unchanged");
        }

        self.refresh(pipeline.graph());
        result
    }

    /// Re-project from the graph after the document changed.
    ///
    /// Keeps the last rows if the node is gone. A draft being edited is
    /// left alone; only the display follows the document.
    pub fn refresh(&mut self, graph: &GraphModel) {
        match graph.node_at(&self.path) {
            Some(node) => self.rows = node.rows.clone(),
            None => tracing::debug!(path = %self.path, "node missing, keeping last rows"),
        }

        self.projection = self.projector.project(&self.rows);
        if !self.is_editing() {
            self.draft = self.projection.fields.clone();
        }
    }
}
