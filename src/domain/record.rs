//! Nested record form of a tree, as written to document files.
//!
//! A document is a JSON array of top-level records; each record carries its
//! children inline. Every field is required on read.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, NodeTree};
use crate::domain::entities::{NodeData, Position, Priority};
use crate::domain::error::DomainError;

/// One node and its descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub title: String,
    pub x: f64,
    pub y: f64,
    /// One of `"{}"`, `"[]"`, `"()"`
    pub priority: String,
    pub progress: i64,
    pub text: String,
    pub people: Vec<String>,
    pub comments: Vec<String>,
    pub files: Vec<String>,
    pub children: Vec<NodeRecord>,
}

impl NodeRecord {
    fn from_data(data: &NodeData, children: Vec<NodeRecord>) -> Self {
        Self {
            title: data.title.to_string(),
            x: data.position.x,
            y: data.position.y,
            priority: data.priority.tag().to_string(),
            progress: i64::from(data.progress.value()),
            text: data.text.clone(),
            people: data.people.clone(),
            comments: data.comments.clone(),
            files: data.files.clone(),
            children,
        }
    }

    fn to_data(&self) -> Result<NodeData, DomainError> {
        NodeData::builder(self.title.clone())
            .position(Position::new(self.x, self.y))
            .priority(Priority::from_tag(&self.priority)?)
            .progress(self.progress)
            .text(self.text.clone())
            .people(self.people.clone())
            .comments(self.comments.clone())
            .files(self.files.clone())
            .build()
    }
}

/// Convert every top-level node, with its full descendant chain, to records.
#[instrument(level = "debug", skip(tree))]
pub fn serialize(tree: &NodeTree) -> Vec<NodeRecord> {
    tree.top_level()
        .iter()
        .filter_map(|&idx| record_for(tree, idx))
        .collect()
}

fn record_for(tree: &NodeTree, idx: NodeId) -> Option<NodeRecord> {
    let node = tree.get(idx)?;
    let children = node
        .children
        .iter()
        .filter_map(|&child| record_for(tree, child))
        .collect();
    Some(NodeRecord::from_data(&node.data, children))
}

/// Rebuild a tree from records.
///
/// Nodes are registered in pre-order and the first top-level record becomes the
/// root. Any invalid record fails the whole conversion with
/// [`DomainError::DataFormat`] naming the offending node's path.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub fn deserialize(records: &[NodeRecord]) -> Result<NodeTree, DomainError> {
    let mut tree = NodeTree::empty();
    let mut path = Vec::new();
    for record in records {
        rebuild(&mut tree, record, None, &mut path)?;
    }
    if let Some(&first) = tree.top_level().first() {
        tree.set_root(first);
    }
    debug!("deserialized {} nodes", tree.len());
    Ok(tree)
}

fn rebuild<'r>(
    tree: &mut NodeTree,
    record: &'r NodeRecord,
    parent: Option<NodeId>,
    path: &mut Vec<&'r str>,
) -> Result<(), DomainError> {
    path.push(&record.title);
    let data = record
        .to_data()
        .map_err(|e| DomainError::data_format(format!("node {:?}: {}", path.join("/"), e)))?;
    let idx = tree
        .insert(data, parent)
        .ok_or_else(|| DomainError::data_format(format!("node {:?}: parent vanished", path.join("/"))))?;
    for child in &record.children {
        rebuild(tree, child, Some(idx), path)?;
    }
    path.pop();
    Ok(())
}

/// Render a tree as a JSON document.
///
/// JSON has no encoding for non-finite numbers, so a node positioned at one
/// fails the whole rendering instead of being written as `null`.
pub fn to_json(tree: &NodeTree) -> Result<String, DomainError> {
    if let Some((_, node)) = tree.iter().find(|(_, n)| !n.data.position.is_finite()) {
        return Err(DomainError::data_format(format!(
            "node {:?}: position {} is not finite",
            node.data.title.as_str(),
            node.data.position
        )));
    }
    serde_json::to_string_pretty(&serialize(tree))
        .map_err(|e| DomainError::data_format(e.to_string()))
}

/// Parse a JSON document. Missing fields and invalid values are data format errors.
pub fn from_json(content: &str) -> Result<NodeTree, DomainError> {
    let records: Vec<NodeRecord> =
        serde_json::from_str(content).map_err(|e| DomainError::data_format(e.to_string()))?;
    deserialize(&records)
}
