//! Keyword lookup over node titles.

use tracing::instrument;

use crate::domain::arena::{NodeId, NodeTree};

/// First node, in registration order, whose title contains `fragment`
/// ignoring case. An empty fragment matches nothing.
#[instrument(level = "debug", skip(tree))]
pub fn find_by_title_fragment(tree: &NodeTree, fragment: &str) -> Option<NodeId> {
    if fragment.is_empty() {
        return None;
    }
    let needle = fragment.to_lowercase();
    tree.iter()
        .find(|(_, node)| node.data.title.as_str().to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
}
