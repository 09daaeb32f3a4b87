//! Editing session over one tree
//!
//! Holds what the user is pointing at: the selected node and the node being
//! dragged. Every structural change goes through the tree's own operations.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::DocumentService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    find_by_title_fragment, DomainError, HitTester, NodeData, NodeEdit, NodeId, NodeTree, Position,
    Progress,
};

/// Distance covered by one press of a move button.
pub const STEP: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Screen coordinates: y grows downwards.
    pub fn delta(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -STEP),
            Direction::Down => (0.0, STEP),
            Direction::Left => (-STEP, 0.0),
            Direction::Right => (STEP, 0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    tree: NodeTree,
    hit_tester: HitTester,
    selected: Option<NodeId>,
    dragging: Option<NodeId>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(NodeTree::new())
    }
}

impl EditSession {
    pub fn new(tree: NodeTree) -> Self {
        Self::with_hit_tester(tree, HitTester::default())
    }

    pub fn with_hit_tester(tree: NodeTree, hit_tester: HitTester) -> Self {
        Self {
            tree,
            hit_tester,
            selected: None,
            dragging: None,
        }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn into_tree(self) -> NodeTree {
        self.tree
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected.filter(|&idx| self.tree.contains(idx))
    }

    pub fn dragging(&self) -> Option<NodeId> {
        self.dragging
    }

    /// Select the node under `point`. A click on empty space keeps the selection.
    #[instrument(level = "debug", skip(self))]
    pub fn select_at(&mut self, point: Position) -> Option<NodeId> {
        let hit = self.hit_tester.find_at(&self.tree, point)?;
        self.selected = Some(hit);
        Some(hit)
    }

    pub fn select(&mut self, node: NodeId) -> bool {
        if self.tree.contains(node) {
            self.selected = Some(node);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Press on a node: select it and start dragging it.
    pub fn begin_drag(&mut self, point: Position) -> Option<NodeId> {
        let hit = self.select_at(point)?;
        self.dragging = Some(hit);
        Some(hit)
    }

    /// Pointer motion while pressed: the dragged node follows the pointer.
    pub fn drag_to(&mut self, point: Position) -> Option<Position> {
        let node = self.dragging?;
        self.tree.place_node(node, point).ok()
    }

    pub fn drop_drag(&mut self) {
        self.dragging = None;
    }

    pub fn move_selected(&mut self, dx: f64, dy: f64) -> ApplicationResult<Position> {
        let node = self.selected().ok_or(ApplicationError::NoSelection)?;
        Ok(self.tree.move_node(node, dx, dy)?)
    }

    pub fn step(&mut self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        self.move_selected(dx, dy).ok()
    }

    /// Add a child of the selection. Without a selection this only works on
    /// an empty tree, where the node becomes top-level.
    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&mut self, title: &str) -> Option<NodeId> {
        if !self.may_add() {
            return None;
        }
        let anchor = self.selected();
        self.tree.add_node(anchor, title)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_twin_branch(&mut self, title: &str) -> Option<NodeId> {
        if !self.may_add() {
            return None;
        }
        let anchor = self.selected();
        self.tree.add_twin_branch(anchor, title)
    }

    fn may_add(&self) -> bool {
        self.selected().is_some() || self.tree.is_empty()
    }

    pub fn edit_selected(&mut self, edit: NodeEdit) -> ApplicationResult<()> {
        let node = self.selected().ok_or(ApplicationError::NoSelection)?;
        self.tree.update_node(node, edit)?;
        Ok(())
    }

    /// Slider-style progress change: out-of-range values are clamped to 0..=100.
    pub fn set_progress(&mut self, value: i64) -> ApplicationResult<Progress> {
        let node = self.selected().ok_or(ApplicationError::NoSelection)?;
        let progress = Progress::clamped(value);
        let data = self.tree.data_mut(node).ok_or(DomainError::NodeNotFound)?;
        data.progress = progress;
        Ok(progress)
    }

    /// Delete the selection once the user has confirmed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_selected(&mut self, confirmed: bool) -> Option<NodeData> {
        if !confirmed {
            debug!("delete_selected: not confirmed");
            return None;
        }
        let node = self.selected()?;
        let removed = self.tree.delete_node(node)?;
        self.selected = None;
        if self.dragging == Some(node) {
            self.dragging = None;
        }
        Some(removed)
    }

    /// Select and return the first node whose title contains `keyword`.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&mut self, keyword: &str) -> Option<NodeId> {
        let found = find_by_title_fragment(&self.tree, keyword)?;
        self.selected = Some(found);
        Some(found)
    }

    /// Swap in another tree, dropping selection and drag state.
    pub fn replace_tree(&mut self, tree: NodeTree) -> NodeTree {
        self.selected = None;
        self.dragging = None;
        std::mem::replace(&mut self.tree, tree)
    }

    /// Load a document. On failure the current tree and selection are kept.
    pub fn load(&mut self, documents: &DocumentService, path: &Path) -> ApplicationResult<()> {
        let tree = documents.load(path)?;
        self.replace_tree(tree);
        Ok(())
    }

    pub fn save(&self, documents: &DocumentService, path: &Path) -> ApplicationResult<()> {
        documents.save(&self.tree, path)
    }

    /// Direct tree mutation for operations addressed by id rather than selection.
    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }
}
