//! Contracts between sticky sections and the host's child nodes.

use sticky_core::{ChildRole, Constraints, NodeId, Point, Rect, Size};

/// A child subtree the host knows how to measure and paint.
pub trait LayoutChild {
    fn node_id(&self) -> NodeId;

    /// Measures the child. Implementations must return a non-negative, non-NaN size.
    fn measure(&mut self, constraints: Constraints) -> Size;

    /// Whether the child accepts pointer input at `local` (child coordinates).
    fn hit_test(&self, _local: Point) -> bool {
        true
    }

    /// Whether keyboard focus and assistive technology may enter the child.
    fn is_focusable(&self) -> bool {
        true
    }

    /// Paints the child with its origin at `origin`.
    fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        scope.paint_at(self.node_id(), origin);
    }
}

/// Paint surface supplied by the host.
pub trait PaintScope {
    fn paint_at(&mut self, node: NodeId, origin: Point);

    fn push_clip(&mut self, _rect: Rect) {}

    fn pop_clip(&mut self) {}
}

/// Child hit by a pointer, with the pointer expressed in child coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTarget {
    pub role: ChildRole,
    pub node_id: NodeId,
    pub local: Point,
}

/// Leaf child with a fixed preferred size.
///
/// Width follows the incoming constraints; height is the preferred height.
#[derive(Clone, Copy, Debug)]
pub struct LeafChild {
    node_id: NodeId,
    preferred: Size,
}

impl LeafChild {
    pub fn new(node_id: NodeId, preferred: Size) -> Self {
        Self { node_id, preferred }
    }

    pub fn preferred_size(&self) -> Size {
        self.preferred
    }

    pub fn set_preferred_size(&mut self, size: Size) {
        self.preferred = size;
    }
}

impl LayoutChild for LeafChild {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        constraints.constrain(self.preferred)
    }
}
