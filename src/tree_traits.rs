//! Text rendering of a tree for terminal output.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeData, NodeId, NodeTree};

pub trait TreeNodeConvert {
    /// Render under a synthetic top label (the tree can have several top-level nodes).
    fn to_tree_string(&self, label: &str) -> Tree<String>;
}

/// One-line summary: title, priority tag, progress, comment count, position.
pub fn node_label(data: &NodeData) -> String {
    format!(
        "{} {} {} C:{} {}",
        data.title,
        data.priority,
        data.progress,
        data.comments.len(),
        data.position
    )
}

impl TreeNodeConvert for NodeTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, label: &str) -> Tree<String> {
        fn build_tree(tree: &NodeTree, node_idx: NodeId) -> Option<Tree<String>> {
            let node = tree.get(node_idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(tree, child))
                .collect();
            Some(Tree::new(node_label(&node.data)).with_leaves(leaves))
        }

        let leaves: Vec<_> = self
            .top_level()
            .iter()
            .filter_map(|&idx| build_tree(self, idx))
            .collect();
        Tree::new(label.to_string()).with_leaves(leaves)
    }
}
