use sticky_core::{NodeId, Point, Rect};
use sticky_ui::PaintScope;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    Node { node: NodeId, origin: Point },
    PushClip(Rect),
    PopClip,
}

/// Paint scope that records every operation instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingPaintScope {
    ops: Vec<PaintOp>,
}

impl RecordingPaintScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Nodes in paint order.
    pub fn painted_nodes(&self) -> Vec<NodeId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Node { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Origin of the last paint of `node`.
    pub fn origin_of(&self, node: NodeId) -> Option<Point> {
        self.ops.iter().rev().find_map(|op| match op {
            PaintOp::Node { node: id, origin } if *id == node => Some(*origin),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl PaintScope for RecordingPaintScope {
    fn paint_at(&mut self, node: NodeId, origin: Point) {
        self.ops.push(PaintOp::Node { node, origin });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ops.push(PaintOp::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.ops.push(PaintOp::PopClip);
    }
}
