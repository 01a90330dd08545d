//! Size transition for expandable section content.

use std::cell::RefCell;
use std::rc::Rc;

use sticky_core::{Constraints, NodeId, Point, Rect, Size};

use crate::expander::{ExpanderController, ExpanderDirection};
use crate::layout_child::{LayoutChild, PaintScope};

/// Wraps the content child and reports only the revealed part of its height.
///
/// The inner child is always measured at full height so the sticky engine
/// sees the real, animating section height. Pointer input and focus are cut
/// off as soon as the expander heads toward collapsed.
pub struct ExpandableContent {
    inner: Box<dyn LayoutChild>,
    expander: Rc<RefCell<ExpanderController>>,
    full_size: Size,
    visible_height: f32,
}

impl ExpandableContent {
    pub fn new(inner: Box<dyn LayoutChild>, expander: Rc<RefCell<ExpanderController>>) -> Self {
        Self {
            inner,
            expander,
            full_size: Size::ZERO,
            visible_height: 0.0,
        }
    }

    pub fn full_size(&self) -> Size {
        self.full_size
    }

    pub fn visible_height(&self) -> f32 {
        self.visible_height
    }

    /// Offset of the inner child's origin inside the revealed area.
    fn inner_offset(&self) -> f32 {
        match self.expander.borrow().direction() {
            ExpanderDirection::Down => 0.0,
            ExpanderDirection::Up => self.visible_height - self.full_size.height,
        }
    }
}

impl LayoutChild for ExpandableContent {
    fn node_id(&self) -> NodeId {
        self.inner.node_id()
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let full = self.inner.measure(constraints.with_unbounded_height());
        let progress = self.expander.borrow().animation_progress();
        self.full_size = full;
        self.visible_height = full.height * progress;
        Size::new(full.width, self.visible_height)
    }

    fn hit_test(&self, local: Point) -> bool {
        if !self.expander.borrow().content_interactive() {
            return false;
        }
        if local.y < 0.0 || local.y >= self.visible_height {
            return false;
        }
        self.inner.hit_test(local.translate(0.0, -self.inner_offset()))
    }

    fn is_focusable(&self) -> bool {
        self.expander.borrow().content_interactive() && self.inner.is_focusable()
    }

    fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        if self.visible_height <= 0.0 {
            return;
        }
        scope.push_clip(Rect::from_origin_size(
            origin,
            Size::new(self.full_size.width, self.visible_height),
        ));
        self.inner
            .paint(scope, origin.translate(0.0, self.inner_offset()));
        scope.pop_clip();
    }
}
