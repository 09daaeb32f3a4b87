//! Point-to-node resolution for selection and dragging.

use tracing::instrument;

use crate::domain::arena::{NodeId, NodeTree};
use crate::domain::entities::Position;

/// Radius of the circular region a node occupies on the plane.
pub const HIT_RADIUS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    radius: f64,
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new(HIT_RADIUS)
    }
}

impl HitTester {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Strict containment: points on the circle's edge do not hit.
    pub fn contains(&self, center: Position, point: Position) -> bool {
        center.distance_squared(point) < self.radius * self.radius
    }

    /// First node in registration order whose region contains `point`.
    ///
    /// Overlaps are resolved by registration order, not by distance.
    #[instrument(level = "trace", skip(self, tree))]
    pub fn find_at(&self, tree: &NodeTree, point: Position) -> Option<NodeId> {
        tree.iter()
            .find(|(_, node)| self.contains(node.data.position, point))
            .map(|(idx, _)| idx)
    }
}
