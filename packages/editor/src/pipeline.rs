//! # Editing Pipeline
//!
//! Coordinates one edit: Read → Parse → Mutate → Serialize → Publish
//!
//! The Pipeline owns:
//! - the injected document text store and content buffer
//! - the graph model derived from the last published text
//! - the current node selection
//!
//! Nothing is published until the new text is fully serialized, and a
//! failed or unchanged edit publishes nothing at all.

use crate::document::{ContentBuffer, Document, DocumentTextStore};
use crate::graph::{GraphModel, GraphNode};
use crate::mutations::{CommitOutcome, Mutation};
use crate::path::StructuralPath;
use crate::projection::{EditableFieldSet, FieldProjector, NodeRow, Projection};
use crate::{EditorConfig, EditorError};

/// Rows and location of the selected node
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedNode {
    pub rows: Vec<NodeRow>,
    pub path: StructuralPath,
}

impl From<&GraphNode> for SelectedNode {
    fn from(node: &GraphNode) -> Self {
        Self {
            rows: node.rows.clone(),
            path: node.path.clone(),
        }
    }
}

/// Read-only view of the current selection
pub trait SelectionProvider {
    fn selected_node(&self) -> Option<SelectedNode>;
}

/// Manages the full edit → publish pipeline
pub struct Pipeline<S, B> {
    store: S,
    buffer: B,
    config: EditorConfig,
    graph: GraphModel,
    selection: Option<StructuralPath>,
    version: u64,
}

impl<S: DocumentTextStore, B: ContentBuffer> Pipeline<S, B> {
    /// Create pipeline over the store's current text
    pub fn new(store: S, buffer: B, config: EditorConfig) -> Result<Self, EditorError> {
        let document = Document::from_text(&store.document_text())?;
        let graph = GraphModel::from_document(document.value());

        Ok(Self {
            store,
            buffer,
            config,
            graph,
            selection: None,
            version: 0,
        })
    }

    /// Replace the document with new text (load or paste)
    ///
    /// The text is canonicalised before it is published.
    pub fn load(&mut self, text: &str) -> Result<PipelineResult, EditorError> {
        let document = Document::from_text(text)?;
        self.publish(&document)?;
        tracing::info!(version = self.version, "document loaded");

        Ok(PipelineResult {
            version: self.version,
            outcome: CommitOutcome::Applied,
        })
    }

    /// Apply mutation and publish the result
    ///
    /// This:
    /// 1. Reads and parses the authoritative text
    /// 2. Applies the mutation to that working copy
    /// 3. Serializes the copy canonically
    /// 4. Publishes to the text store, the content buffer and the graph
    pub fn apply(&mut self, mutation: &Mutation) -> Result<PipelineResult, EditorError> {
        let mut document = Document::from_text(&self.store.document_text())?;
        let outcome = document.apply(mutation)?;

        if outcome == CommitOutcome::Applied {
            self.publish(&document)?;
            tracing::info!(path = %mutation.path(), version = self.version, "mutation published");
        }

        Ok(PipelineResult {
            version: self.version,
            outcome,
        })
    }

    /// Write draft fields at `path`
    pub fn commit_fields(
        &mut self,
        path: &StructuralPath,
        fields: &EditableFieldSet,
    ) -> Result<PipelineResult, EditorError> {
        self.apply(&Mutation::SetFields {
            path: path.clone(),
            fields: fields.clone(),
        })
    }

    /// Replace the value at `path` with coerced `raw` text
    pub fn commit_scalar(
        &mut self,
        path: &StructuralPath,
        raw: &str,
    ) -> Result<PipelineResult, EditorError> {
        self.apply(&Mutation::SetValue {
            path: path.clone(),
            raw: raw.to_string(),
        })
    }

    fn publish(&mut self, document: &Document) -> Result<(), EditorError> {
        let text = document.to_text(self.config.indent_width)?;
        let graph = GraphModel::from_document(document.value());

        self.store.set_document_text(text.clone());
        self.buffer.set_contents(&text);
        self.graph = graph;
        self.version += 1;

        if let Some(path) = &self.selection {
            if self.graph.node_at(path).is_none() {
                tracing::debug!(%path, "selected node no longer exists");
                self.selection = None;
            }
        }

        Ok(())
    }

    /// Select a graph node by id
    pub fn select(&mut self, node_id: &str) -> Result<(), EditorError> {
        let node = self
            .graph
            .node(node_id)
            .ok_or_else(|| EditorError::NodeNotFound(node_id.to_string()))?;
        self.selection = Some(node.path.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Project a node's rows with the configured display settings
    pub fn project(&self, node_id: &str) -> Option<Projection> {
        self.graph
            .node(node_id)
            .map(|node| self.projector().project(&node.rows))
    }

    pub fn projector(&self) -> FieldProjector {
        FieldProjector::new(&self.config)
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// Number of publications so far
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Current document text
    pub fn text(&self) -> String {
        self.store.document_text()
    }
}

impl<S: DocumentTextStore, B: ContentBuffer> SelectionProvider for Pipeline<S, B> {
    fn selected_node(&self) -> Option<SelectedNode> {
        let path = self.selection.as_ref()?;
        self.graph.node_at(path).map(SelectedNode::from)
    }
}

/// Result of pipeline execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineResult {
    /// Version after the call
    pub version: u64,

    pub outcome: CommitOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBuffer, MemoryTextStore, MutationError};

    fn pipeline(text: &str) -> Pipeline<MemoryTextStore, MemoryBuffer> {
        Pipeline::new(
            MemoryTextStore::new(text),
            MemoryBuffer::default(),
            EditorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_text() {
        let result = Pipeline::new(
            MemoryTextStore::new("{"),
            MemoryBuffer::default(),
            EditorConfig::default(),
        );
        assert!(matches!(result, Err(EditorError::Parse(_))));
    }

    #[test]
    fn test_commit_publishes_to_both_views() {
        let mut pipeline = pipeline(r#"{"flag": true}"#);

        let result = pipeline
            .commit_scalar(&StructuralPath::root().key("flag"), "false")
            .unwrap();

        assert_eq!(result.outcome, CommitOutcome::Applied);
        assert_eq!(result.version, 1);
        assert_eq!(pipeline.text(), "{\n  \"flag\": false\n}");
        assert_eq!(pipeline.buffer().contents(), pipeline.text());
        assert_eq!(pipeline.buffer().updates(), 1);
    }

    #[test]
    fn test_unchanged_commit_publishes_nothing() {
        let mut pipeline = pipeline(r#"{"flag": true}"#);

        let result = pipeline
            .commit_scalar(&StructuralPath::root().key("flag"), "true")
            .unwrap();

        assert_eq!(result.outcome, CommitOutcome::Unchanged);
        assert_eq!(result.version, 0);
        assert_eq!(pipeline.buffer().updates(), 0);
        assert_eq!(pipeline.text(), r#"{"flag": true}"#);
    }

    #[test]
    fn test_failed_commit_publishes_nothing() {
        let mut pipeline = pipeline(r#"{"x": 1}"#);

        let err = pipeline
            .commit_scalar(&StructuralPath::root().key("a").key("b"), "1")
            .unwrap_err();

        assert!(matches!(err, EditorError::Mutation(MutationError::Resolve(_))));
        assert!(err.to_string().starts_with("Mutation error: Invalid path"));
        assert_eq!(pipeline.version(), 0);
        assert_eq!(pipeline.buffer().updates(), 0);
        assert_eq!(pipeline.text(), r#"{"x": 1}"#);
    }

    #[test]
    fn test_parse_failure_at_commit_time() {
        let mut pipeline = pipeline("{}");
        // Text store edited behind the pipeline's back
        pipeline.store.set_document_text("{ broken".to_string());

        let result = pipeline.commit_scalar(&StructuralPath::root().key("a"), "1");
        assert!(matches!(result, Err(EditorError::Parse(_))));
        assert_eq!(pipeline.text(), "{ broken");
    }

    #[test]
    fn test_graph_rebuilt_after_commit() {
        let mut pipeline = pipeline(r#"{"user": {"age": 30}}"#);
        let user = StructuralPath::root().key("user");

        let mut fields = EditableFieldSet::new();
        fields.insert("nick".to_string(), "ace".to_string());
        pipeline.commit_fields(&user, &fields).unwrap();

        let node = pipeline.graph().node_at(&user).unwrap();
        assert_eq!(node.rows.len(), 2);
        assert_eq!(
            pipeline.project(&node.id).unwrap().fields["nick"],
            "ace"
        );
    }

    #[test]
    fn test_selection_follows_path() {
        let mut pipeline = pipeline(r#"{"a": {"v": 1}, "b": {"v": 2}}"#);
        let b = pipeline
            .graph()
            .node_at(&StructuralPath::root().key("b"))
            .unwrap()
            .id
            .clone();
        pipeline.select(&b).unwrap();

        pipeline
            .commit_scalar(&StructuralPath::root().key("b").key("v"), "3")
            .unwrap();

        let selected = pipeline.selected_node().unwrap();
        assert_eq!(selected.path, StructuralPath::root().key("b"));
        assert_eq!(
            selected.rows,
            vec![NodeRow::scalar(Some("v".to_string()), serde_json::json!(3))]
        );
    }

    #[test]
    fn test_selection_cleared_when_node_disappears() {
        let mut pipeline = pipeline(r#"{"a": {"v": 1}}"#);
        let a = pipeline
            .graph()
            .node_at(&StructuralPath::root().key("a"))
            .unwrap()
            .id
            .clone();
        pipeline.select(&a).unwrap();

        pipeline
            .commit_scalar(&StructuralPath::root().key("a"), "gone")
            .unwrap();

        assert!(pipeline.selected_node().is_none());
    }

    #[test]
    fn test_select_unknown_node() {
        let mut pipeline = pipeline("{}");
        assert!(matches!(
            pipeline.select("99"),
            Err(EditorError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_load_canonicalises() {
        let mut pipeline = pipeline("{}");
        let result = pipeline.load(r#"[1,   2]"#).unwrap();

        assert_eq!(result.version, 1);
        assert_eq!(pipeline.text(), "[\n  1,\n  2\n]");
        assert_eq!(pipeline.graph().nodes().len(), 2);
    }
}
