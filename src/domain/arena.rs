use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{NodeData, NodeEdit, Position, Title};
use crate::domain::error::DomainError;

/// Stable identifier of a node; stale after the node is deleted.
pub type NodeId = Index;

/// Title of the node every fresh tree starts with.
pub const ROOT_TITLE: &str = "Root";

/// Placement of the root and of anchorless new nodes.
pub const DEFAULT_POSITION: Position = Position::new(300.0, 100.0);

/// Horizontal (and, for plain branches, vertical) distance from the anchor.
pub const BRANCH_OFFSET: f64 = 100.0;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Payload edited by the user
    pub data: NodeData,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<NodeId>,
}

/// Arena-based organizational tree.
///
/// Every node lives in a single arena slot. Parent/child structure is kept as
/// identifier links on both ends, the registry records registration order of all
/// live nodes, and the top-level list holds the unparented nodes in order.
#[derive(Debug, Clone)]
pub struct NodeTree {
    arena: Arena<TreeNode>,
    registry: Vec<NodeId>,
    top_level: Vec<NodeId>,
    root: Option<NodeId>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Tree holding only the designated root.
    pub fn new() -> Self {
        let mut tree = Self::empty();
        if let Ok(title) = Title::new(ROOT_TITLE) {
            tree.root = tree.insert(NodeData::new(title, DEFAULT_POSITION), None);
        }
        tree
    }

    /// Tree without any node, not even a root.
    pub fn empty() -> Self {
        Self {
            arena: Arena::new(),
            registry: Vec::new(),
            top_level: Vec::new(),
            root: None,
        }
    }

    /// Register `data`, appending it to `parent`'s children or to the top level.
    ///
    /// Returns None when `parent` does not name a live node.
    #[instrument(level = "trace", skip(self, data))]
    pub(crate) fn insert(&mut self, data: NodeData, parent: Option<NodeId>) -> Option<NodeId> {
        if let Some(parent_idx) = parent {
            if !self.arena.contains(parent_idx) {
                return None;
            }
        }
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|idx| self.arena.get_mut(idx)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.top_level.push(node_idx),
        }
        self.registry.push(node_idx);
        Some(node_idx)
    }

    /// Create a child of `anchor` diagonally below-right of it, or a new
    /// top-level node at [`DEFAULT_POSITION`] when there is no anchor.
    ///
    /// Empty titles and stale anchors are ignored.
    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&mut self, anchor: Option<NodeId>, title: &str) -> Option<NodeId> {
        self.add_branch(anchor, title, BRANCH_OFFSET, BRANCH_OFFSET)
    }

    /// Like [`NodeTree::add_node`], but the new child sits level with its anchor.
    #[instrument(level = "debug", skip(self))]
    pub fn add_twin_branch(&mut self, anchor: Option<NodeId>, title: &str) -> Option<NodeId> {
        self.add_branch(anchor, title, BRANCH_OFFSET, 0.0)
    }

    fn add_branch(
        &mut self,
        anchor: Option<NodeId>,
        title: &str,
        dx: f64,
        dy: f64,
    ) -> Option<NodeId> {
        let title = Title::new(title).ok()?;
        let position = match anchor {
            Some(idx) => self.arena.get(idx)?.data.position.translated(dx, dy),
            None => DEFAULT_POSITION,
        };
        let idx = self.insert(NodeData::new(title, position), anchor)?;
        debug!("added node {:?} at {}", idx, position);
        Some(idx)
    }

    /// Translate one node. Descendants keep their absolute positions.
    ///
    /// A translation whose result is not finite is rejected and the node stays put.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&mut self, node: NodeId, dx: f64, dy: f64) -> Result<Position, DomainError> {
        let current = self.data(node).ok_or(DomainError::NodeNotFound)?.position;
        self.place_node(node, current.translated(dx, dy))
    }

    /// Put one node at an absolute position (drag and drop).
    #[instrument(level = "debug", skip(self))]
    pub fn place_node(
        &mut self,
        node: NodeId,
        position: Position,
    ) -> Result<Position, DomainError> {
        let data = self.data_mut(node).ok_or(DomainError::NodeNotFound)?;
        if !position.is_finite() {
            return Err(DomainError::InvalidPosition(position.to_string()));
        }
        data.position = position;
        Ok(position)
    }

    /// Remove a node from the registry and from its parent's children.
    ///
    /// Confirmation is the caller's business. The children of the removed node
    /// stay registered and are appended to the top level. Unknown ids are a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&mut self, node: NodeId) -> Option<NodeData> {
        let removed = self.arena.remove(node)?;

        match removed.parent.and_then(|idx| self.arena.get_mut(idx)) {
            Some(parent) => parent.children.retain(|&c| c != node),
            None => self.top_level.retain(|&n| n != node),
        }
        self.registry.retain(|&n| n != node);

        for &child in &removed.children {
            if let Some(orphan) = self.arena.get_mut(child) {
                orphan.parent = None;
                self.top_level.push(child);
            }
        }
        if self.root == Some(node) {
            self.root = None;
        }
        debug!(
            "deleted node {:?}, {} children promoted to top level",
            node,
            removed.children.len()
        );
        Some(removed.data)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn update_node(&mut self, node: NodeId, edit: NodeEdit) -> Result<(), DomainError> {
        self.data_mut(node)
            .ok_or(DomainError::NodeNotFound)?
            .apply(edit)
    }

    pub fn add_comment(&mut self, node: NodeId, comment: &str) -> Result<usize, DomainError> {
        let comments = &mut self.data_mut(node).ok_or(DomainError::NodeNotFound)?.comments;
        comments.push(comment.to_string());
        Ok(comments.len() - 1)
    }

    /// Replace a comment, returning the previous text.
    pub fn edit_comment(
        &mut self,
        node: NodeId,
        index: usize,
        comment: &str,
    ) -> Result<String, DomainError> {
        let comments = &mut self.data_mut(node).ok_or(DomainError::NodeNotFound)?.comments;
        let slot = checked_slot(comments, "comment", index)?;
        Ok(std::mem::replace(slot, comment.to_string()))
    }

    pub fn remove_comment(&mut self, node: NodeId, index: usize) -> Result<String, DomainError> {
        let comments = &mut self.data_mut(node).ok_or(DomainError::NodeNotFound)?.comments;
        checked_slot(comments, "comment", index)?;
        Ok(comments.remove(index))
    }

    pub fn attach_file(&mut self, node: NodeId, file: &str) -> Result<usize, DomainError> {
        let files = &mut self.data_mut(node).ok_or(DomainError::NodeNotFound)?.files;
        files.push(file.to_string());
        Ok(files.len() - 1)
    }

    /// Point an existing file reference elsewhere, keeping its slot.
    pub fn replace_file(
        &mut self,
        node: NodeId,
        index: usize,
        file: &str,
    ) -> Result<String, DomainError> {
        let files = &mut self.data_mut(node).ok_or(DomainError::NodeNotFound)?.files;
        let slot = checked_slot(files, "file", index)?;
        Ok(std::mem::replace(slot, file.to_string()))
    }

    pub fn detach_file(&mut self, node: NodeId, index: usize) -> Result<String, DomainError> {
        let files = &mut self.data_mut(node).ok_or(DomainError::NodeNotFound)?.files;
        checked_slot(files, "file", index)?;
        Ok(files.remove(index))
    }

    pub fn clear_text(&mut self, node: NodeId) -> Result<(), DomainError> {
        self.data_mut(node).ok_or(DomainError::NodeNotFound)?.text.clear();
        Ok(())
    }

    pub fn get(&self, node: NodeId) -> Option<&TreeNode> {
        self.arena.get(node)
    }

    pub fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.arena.get(node).map(|n| &n.data)
    }

    /// Mutable payload access; structural links stay private to the tree.
    pub fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.arena.get_mut(node).map(|n| &mut n.data)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.contains(node)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Designate an existing node as the root. Returns false for unknown ids.
    pub fn set_root(&mut self, node: NodeId) -> bool {
        if self.arena.contains(node) {
            self.root = Some(node);
            true
        } else {
            false
        }
    }

    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    /// All live nodes in registration order.
    pub fn registry(&self) -> &[NodeId] {
        &self.registry
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.arena
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.parent)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.registry
            .iter()
            .filter_map(move |&idx| self.arena.get(idx).map(|node| (idx, node)))
    }

    /// Depth-first pre-order walk over every top-level subtree.
    pub fn iter_preorder(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Number of levels of the deepest subtree, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.top_level
            .iter()
            .map(|&idx| self.calculate_depth(idx))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Nodes without children, in pre-order.
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        self.iter_preorder()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }
}

fn checked_slot<'a>(
    items: &'a mut [String],
    kind: &'static str,
    index: usize,
) -> Result<&'a mut String, DomainError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(DomainError::ItemOutOfRange { kind, index, len })
}

pub struct PreOrderIterator<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a NodeTree) -> Self {
        // Reverse so the first top-level node is visited first
        let stack = tree.top_level.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
