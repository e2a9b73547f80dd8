//! # Graph Model
//!
//! Derives the node graph shown by the visual view from a document value.
//!
//! - An object is one node: a row per member, container members as rows
//!   without a value plus an edge to each child node.
//! - Array elements are nodes of their own, hung off whoever holds the array.
//!   A scalar element is a node with one unkeyed row; a nested array is a
//!   node with one unkeyed `array` row.
//! - A root scalar is a single unkeyed node; a root array contributes only
//!   its elements.
//!
//! Ids are assigned in pre-order, so a document always yields the same ids.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coercion::normalize_numbers;
use crate::path::StructuralPath;
use crate::projection::{NodeRow, RowType};

/// A node of the graph view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub rows: Vec<NodeRow>,
    /// Location of the value this node was derived from
    pub path: StructuralPath,
}

/// Parent → child link, labelled with the member key when there is one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl GraphModel {
    pub fn from_document(root: &Value) -> Self {
        let mut builder = GraphBuilder::default();

        match root {
            Value::Object(map) => {
                builder.object_node(map, StructuralPath::root());
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    builder.element_node(item, StructuralPath::root().index(index));
                }
            }
            scalar => {
                builder.element_node(scalar, StructuralPath::root());
            }
        }

        tracing::debug!(
            nodes = builder.model.nodes.len(),
            edges = builder.model.edges.len(),
            "graph model built"
        );
        builder.model
    }

    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        let mut root: Value = serde_json::from_str(text)?;
        normalize_numbers(&mut root);
        Ok(Self::from_document(&root))
    }

    /// Nodes in pre-order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_at(&self, path: &StructuralPath) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| &node.path == path)
    }

    /// Direct children of a node, in edge order
    pub fn children(&self, id: &str) -> impl Iterator<Item = &GraphNode> + '_ {
        let id = id.to_string();
        self.edges
            .iter()
            .filter(move |edge| edge.from == id)
            .filter_map(|edge| self.node(&edge.to))
    }
}

#[derive(Default)]
struct GraphBuilder {
    model: GraphModel,
    next_id: usize,
}

impl GraphBuilder {
    fn push_node(&mut self, rows: Vec<NodeRow>, path: StructuralPath) -> String {
        self.next_id += 1;
        let id = self.next_id.to_string();
        self.model.nodes.push(GraphNode {
            id: id.clone(),
            rows,
            path,
        });
        id
    }

    fn push_edge(&mut self, from: &str, to: String, label: Option<&str>) {
        self.model.edges.push(GraphEdge {
            from: from.to_string(),
            to,
            label: label.map(str::to_string),
        });
    }

    fn object_node(&mut self, map: &Map<String, Value>, path: StructuralPath) -> String {
        let rows = map
            .iter()
            .map(|(key, value)| match value {
                Value::Object(_) | Value::Array(_) => {
                    NodeRow::container(Some(key.clone()), RowType::of(value))
                }
                scalar => NodeRow::scalar(Some(key.clone()), scalar.clone()),
            })
            .collect();
        let id = self.push_node(rows, path.clone());

        for (key, value) in map {
            let member_path = path.clone().key(key.as_str());
            match value {
                Value::Object(child) => {
                    let child_id = self.object_node(child, member_path);
                    self.push_edge(&id, child_id, Some(key));
                }
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let child_id = self.element_node(item, member_path.clone().index(index));
                        self.push_edge(&id, child_id, Some(key));
                    }
                }
                _ => {}
            }
        }

        id
    }

    fn element_node(&mut self, value: &Value, path: StructuralPath) -> String {
        match value {
            Value::Object(map) => self.object_node(map, path),
            Value::Array(items) => {
                let id = self.push_node(vec![NodeRow::container(None, RowType::Array)], path.clone());
                for (index, item) in items.iter().enumerate() {
                    let child_id = self.element_node(item, path.clone().index(index));
                    self.push_edge(&id, child_id, None);
                }
                id
            }
            scalar => self.push_node(vec![NodeRow::scalar(None, scalar.clone())], path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::lookup;
    use serde_json::json;

    #[test]
    fn test_object_rows_and_children() {
        let doc = json!({
            "name": "Ada",
            "address": {"city": "London"},
            "tags": ["x", {"k": 1}]
        });

        let graph = GraphModel::from_document(&doc);

        let root = graph.node("1").unwrap();
        assert_eq!(root.path, StructuralPath::root());
        assert_eq!(
            root.rows,
            vec![
                NodeRow::scalar(Some("name".to_string()), json!("Ada")),
                NodeRow::container(Some("address".to_string()), RowType::Object),
                NodeRow::container(Some("tags".to_string()), RowType::Array),
            ]
        );

        let children: Vec<_> = graph.children("1").map(|n| n.path.to_string()).collect();
        assert_eq!(
            children,
            vec![
                r#"$["address"]"#,
                r#"$["tags"][0]"#,
                r#"$["tags"][1]"#,
            ]
        );

        let labels: Vec<_> = graph.edges().iter().map(|e| e.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("address"), Some("tags"), Some("tags")]);
    }

    #[test]
    fn test_ids_are_preorder() {
        let doc = json!({"a": {"b": {"c": 1}}, "d": {}});
        let graph = GraphModel::from_document(&doc);

        let order: Vec<_> = graph
            .nodes()
            .iter()
            .map(|n| (n.id.as_str(), n.path.to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("1", "$".to_string()),
                ("2", r#"$["a"]"#.to_string()),
                ("3", r#"$["a"]["b"]"#.to_string()),
                ("4", r#"$["d"]"#.to_string()),
            ]
        );
        assert!(graph.node("4").unwrap().rows.is_empty());
    }

    #[test]
    fn test_root_array_elements() {
        let graph = GraphModel::from_document(&json!([1, 2, 3]));

        assert_eq!(graph.nodes().len(), 3);
        assert!(graph.edges().is_empty());

        let second = graph.node_at(&StructuralPath::root().index(1)).unwrap();
        assert_eq!(second.rows, vec![NodeRow::scalar(None, json!(2))]);
    }

    #[test]
    fn test_root_scalar() {
        let graph = GraphModel::from_document(&json!("hello"));
        assert_eq!(graph.nodes().len(), 1);
        assert_eq!(graph.nodes()[0].path, StructuralPath::root());
        assert_eq!(graph.nodes()[0].rows, vec![NodeRow::scalar(None, json!("hello"))]);
    }

    #[test]
    fn test_nested_array_node() {
        let graph = GraphModel::from_document(&json!({"grid": [[1, 2]]}));

        let inner = graph
            .node_at(&StructuralPath::root().key("grid").index(0))
            .unwrap();
        assert_eq!(inner.rows, vec![NodeRow::container(None, RowType::Array)]);

        let cells: Vec<_> = graph.children(&inner.id).map(|n| n.path.to_string()).collect();
        assert_eq!(cells, vec![r#"$["grid"][0][0]"#, r#"$["grid"][0][1]"#]);
    }

    #[test]
    fn test_node_paths_address_their_values() {
        let doc = json!({"users": [{"name": "a", "roles": ["x"]}], "ok": true});
        let graph = GraphModel::from_document(&doc);

        for node in graph.nodes() {
            let value = lookup(&doc, &node.path).unwrap();
            match value {
                Value::Object(map) => assert_eq!(node.rows.len(), map.len()),
                Value::Array(_) => {
                    assert_eq!(node.rows, vec![NodeRow::container(None, RowType::Array)])
                }
                scalar => assert_eq!(node.rows, vec![NodeRow::scalar(None, scalar.clone())]),
            }
        }
    }

    #[test]
    fn test_from_text() {
        assert!(GraphModel::from_text("{").is_err());
        assert_eq!(GraphModel::from_text("{}").unwrap().nodes().len(), 1);
    }
}
