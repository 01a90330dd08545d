//! StickyHeaderNode - two-child layout node that pins its header.
//!
//! The node owns a header and a content child, measures them independently,
//! and runs [`compute_sticky_layout`] whenever its size, its position in the
//! scrollable, or the scroll offset changes. The header is painted and
//! hit-tested at the stuck offset; the content follows the scroll.

use std::cell::Cell;
use std::rc::Rc;

use sticky_core::{ChildRole, Constraints, Point, Rect, Size, StickyError, StickyResult};
use sticky_foundation::scroll::{ScrollOffsetSource, ScrollSubscriptionId};
use sticky_foundation::sticky::{compute_sticky_layout, HeaderChildLayout, StickyLayoutInput};

use crate::layout_child::{HitTarget, LayoutChild, PaintScope};

/// Callback receiving the new stuck amount.
pub type StuckAmountCallback = Rc<dyn Fn(f32)>;

/// Configuration for a sticky header section.
#[derive(Clone, Default)]
pub struct StickyHeaderSpec {
    /// Paint content from the header's top edge so the header floats over it.
    pub overlap_headers: bool,
    /// Explicit scroll source; takes precedence over the ambient one.
    pub scroll_source: Option<Rc<dyn ScrollOffsetSource>>,
    pub on_stuck_amount_changed: Option<StuckAmountCallback>,
}

impl StickyHeaderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlap_headers(mut self, overlap: bool) -> Self {
        self.overlap_headers = overlap;
        self
    }

    pub fn scroll_source(mut self, source: Rc<dyn ScrollOffsetSource>) -> Self {
        self.scroll_source = Some(source);
        self
    }

    pub fn on_stuck_amount_changed(mut self, callback: impl Fn(f32) + 'static) -> Self {
        self.on_stuck_amount_changed = Some(Rc::new(callback));
        self
    }
}

impl std::fmt::Debug for StickyHeaderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickyHeaderSpec")
            .field("overlap_headers", &self.overlap_headers)
            .field("scroll_source", &self.scroll_source.is_some())
            .field(
                "on_stuck_amount_changed",
                &self.on_stuck_amount_changed.is_some(),
            )
            .finish()
    }
}

/// Layout node pinning a header above scrolling content.
pub struct StickyHeaderNode {
    /// Indexed by [`ChildRole::index`].
    children: [Box<dyn LayoutChild>; 2],
    scroll: Rc<dyn ScrollOffsetSource>,
    subscription: ScrollSubscriptionId,
    scroll_dirty: Rc<Cell<bool>>,
    overlap_headers: bool,
    on_stuck_amount_changed: Option<StuckAmountCallback>,
    section_top: f32,
    /// Set once the parent has supplied a section offset.
    placed: bool,
    /// Measured (header, content) sizes from the last measure pass.
    measured: Option<(Size, Size)>,
    /// Sizes changed since the last placed pass; the next `place` must emit.
    awaiting_place: bool,
    layout: Option<HeaderChildLayout>,
    last_emitted: Option<f32>,
    needs_measure: bool,
}

impl StickyHeaderNode {
    /// Creates the node and subscribes it to its scroll source.
    ///
    /// `ambient_scroll` is the nearest enclosing scrollable resolved by the
    /// host at attach time. It is ignored when `spec.scroll_source` is set;
    /// with neither, construction fails.
    pub fn new(
        spec: StickyHeaderSpec,
        header: Box<dyn LayoutChild>,
        content: Box<dyn LayoutChild>,
        ambient_scroll: Option<Rc<dyn ScrollOffsetSource>>,
    ) -> StickyResult<Self> {
        let scroll = spec
            .scroll_source
            .or(ambient_scroll)
            .ok_or(StickyError::MissingScrollSource)?;

        let scroll_dirty = Rc::new(Cell::new(false));
        let dirty = scroll_dirty.clone();
        let subscription = scroll.subscribe(Rc::new(move |_offset| dirty.set(true)));

        Ok(Self {
            children: [header, content],
            scroll,
            subscription,
            scroll_dirty,
            overlap_headers: spec.overlap_headers,
            on_stuck_amount_changed: spec.on_stuck_amount_changed,
            section_top: 0.0,
            placed: false,
            measured: None,
            awaiting_place: false,
            layout: None,
            last_emitted: None,
            needs_measure: true,
        })
    }

    pub fn child(&self, role: ChildRole) -> &dyn LayoutChild {
        self.children[role.index()].as_ref()
    }

    pub fn child_mut(&mut self, role: ChildRole) -> &mut dyn LayoutChild {
        self.children[role.index()].as_mut()
    }

    /// Swaps a child and schedules a re-measure.
    pub fn replace_child(
        &mut self,
        role: ChildRole,
        child: Box<dyn LayoutChild>,
    ) -> Box<dyn LayoutChild> {
        self.mark_needs_measure();
        std::mem::replace(&mut self.children[role.index()], child)
    }

    pub fn overlap_headers(&self) -> bool {
        self.overlap_headers
    }

    pub fn set_overlap_headers(&mut self, overlap: bool) {
        if self.overlap_headers != overlap {
            self.overlap_headers = overlap;
            self.mark_needs_measure();
        }
    }

    pub fn set_on_stuck_amount_changed(&mut self, callback: Option<StuckAmountCallback>) {
        self.on_stuck_amount_changed = callback;
    }

    pub fn mark_needs_measure(&mut self) {
        self.needs_measure = true;
    }

    pub fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// True when the scroll offset changed since the last pass.
    pub fn is_scroll_dirty(&self) -> bool {
        self.scroll_dirty.get()
    }

    pub fn section_top(&self) -> f32 {
        self.section_top
    }

    /// Layout computed by the last pass.
    pub fn layout_info(&self) -> Option<HeaderChildLayout> {
        self.layout
    }

    /// Last stuck amount delivered to the callback.
    pub fn stuck_amount(&self) -> Option<f32> {
        self.last_emitted
    }

    /// Measures content, then header, and returns the section size.
    ///
    /// Both children get the incoming width bounds and an unbounded height,
    /// and the section size is reported unclamped so it always matches what
    /// is painted. Invalid child sizes are reported, never clamped. The stuck
    /// amount is not delivered here: the section offset is only final once
    /// the parent calls [`place`](Self::place).
    pub fn measure(&mut self, constraints: Constraints) -> StickyResult<Size> {
        if !constraints.has_bounded_width() {
            log::warn!(
                "StickyHeaderNode: measured with unbounded width ({}); children decide their own width",
                constraints.max_width
            );
        }
        let child_constraints = constraints.with_unbounded_height();

        let content = self.measure_child(ChildRole::Content, child_constraints)?;
        let header = self.measure_child(ChildRole::Header, child_constraints)?;
        self.measured = Some((header, content));
        self.needs_measure = false;
        self.awaiting_place = true;

        let layout = self.compute_layout();
        self.layout = layout;
        Ok(layout.map_or(Size::ZERO, |l| l.section_size))
    }

    fn measure_child(&mut self, role: ChildRole, constraints: Constraints) -> StickyResult<Size> {
        let size = self.children[role.index()].measure(constraints);
        if !size.is_valid() {
            return Err(StickyError::InvalidChildSize { role, size });
        }
        Ok(size)
    }

    /// Receives the section's top offset from the parent scrollable.
    pub fn place(&mut self, section_top: f32) {
        if self.placed && self.section_top == section_top && !self.awaiting_place {
            return;
        }
        self.section_top = section_top;
        self.placed = true;
        self.relayout();
    }

    /// Re-runs the engine if the scroll offset moved since the last pass.
    ///
    /// Uses the cached child sizes; no child is re-measured.
    pub fn apply_scroll(&mut self) -> bool {
        if !self.scroll_dirty.get() {
            return false;
        }
        self.relayout().is_some()
    }

    fn compute_layout(&self) -> Option<HeaderChildLayout> {
        let (header_size, content_size) = self.measured?;
        Some(compute_sticky_layout(&StickyLayoutInput {
            header_size,
            content_size,
            section_top: self.section_top,
            scroll_offset: self.scroll.current_offset(),
            overlap_headers: self.overlap_headers,
        }))
    }

    /// Lays the section out at its current offset and delivers the result.
    fn relayout(&mut self) -> Option<HeaderChildLayout> {
        let layout = self.compute_layout()?;
        self.scroll_dirty.set(false);
        self.awaiting_place = false;
        self.layout = Some(layout);
        // Until placed, the section offset is a placeholder and the amount is meaningless.
        if self.placed {
            self.emit_if_changed(layout.stuck_amount);
        }
        Some(layout)
    }

    fn emit_if_changed(&mut self, stuck_amount: f32) {
        if self.last_emitted == Some(stuck_amount) {
            return;
        }
        log::debug!(
            "StickyHeaderNode: stuck amount {:?} -> {} (section top {})",
            self.last_emitted,
            stuck_amount,
            self.section_top
        );
        self.last_emitted = Some(stuck_amount);
        if let Some(callback) = &self.on_stuck_amount_changed {
            callback(stuck_amount);
        }
    }

    /// Paints content, then the header on top of it.
    pub fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        let Some(layout) = self.layout else {
            log::warn!("StickyHeaderNode: paint requested before layout");
            return;
        };
        self.child(ChildRole::Content).paint(
            scope,
            origin.translate(layout.content_offset.x, layout.content_offset.y),
        );
        self.child(ChildRole::Header).paint(
            scope,
            origin.translate(layout.header_offset.x, layout.header_offset.y),
        );
    }

    /// Bounds of a child in section coordinates, as painted.
    pub fn child_bounds(&self, role: ChildRole) -> Option<Rect> {
        let layout = self.layout?;
        Some(match role {
            ChildRole::Header => Rect::from_origin_size(layout.header_offset, layout.header_size),
            ChildRole::Content => {
                Rect::from_origin_size(layout.content_offset, layout.content_size)
            }
        })
    }

    /// Routes a section-local point to the child painted under it.
    ///
    /// The header is tested first at its stuck position since it paints on top.
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        [ChildRole::Header, ChildRole::Content]
            .into_iter()
            .find_map(|role| {
                let bounds = self.child_bounds(role)?;
                if !bounds.contains(point) {
                    return None;
                }
                let local = point.relative_to(bounds.origin());
                let child = self.child(role);
                child.hit_test(local).then(|| HitTarget {
                    role,
                    node_id: child.node_id(),
                    local,
                })
            })
    }
}

impl Drop for StickyHeaderNode {
    fn drop(&mut self) {
        self.scroll.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for StickyHeaderNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickyHeaderNode")
            .field("header", &self.child(ChildRole::Header).node_id())
            .field("content", &self.child(ChildRole::Content).node_id())
            .field("overlap_headers", &self.overlap_headers)
            .field("section_top", &self.section_top)
            .field("layout", &self.layout)
            .field("needs_measure", &self.needs_measure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_child::LeafChild;
    use std::cell::RefCell;
    use sticky_foundation::ScrollState;

    const WIDTH: f32 = 320.0;

    fn node(scroll: &ScrollState, spec: StickyHeaderSpec) -> StickyHeaderNode {
        let header = Box::new(LeafChild::new(1, Size::new(WIDTH, 50.0)));
        let content = Box::new(LeafChild::new(2, Size::new(WIDTH, 400.0)));
        let ambient: Rc<dyn ScrollOffsetSource> = Rc::new(scroll.clone());
        StickyHeaderNode::new(spec, header, content, Some(ambient)).unwrap()
    }

    fn viewport() -> Constraints {
        Constraints::loose(Size::new(WIDTH, 600.0))
    }

    #[test]
    fn missing_scroll_source_fails_at_construction() {
        let header = Box::new(LeafChild::new(1, Size::new(WIDTH, 50.0)));
        let content = Box::new(LeafChild::new(2, Size::new(WIDTH, 400.0)));
        let err = StickyHeaderNode::new(StickyHeaderSpec::new(), header, content, None).unwrap_err();
        assert_eq!(err, StickyError::MissingScrollSource);
    }

    #[test]
    fn explicit_source_wins_over_ambient() {
        let ambient = ScrollState::new(0.0);
        let explicit = ScrollState::new(1370.0);
        let mut node = node(
            &ambient,
            StickyHeaderSpec::new().scroll_source(Rc::new(explicit.clone())),
        );
        node.measure(viewport()).unwrap();
        node.place(1000.0);
        assert!((node.stuck_amount().unwrap() + 0.4).abs() < 1e-6);
        assert_eq!(ambient.listener_count(), 0);
        assert_eq!(explicit.listener_count(), 1);
    }

    #[test]
    fn reports_section_size() {
        let scroll = ScrollState::new(0.0);
        let mut plain = node(&scroll, StickyHeaderSpec::new());
        assert_eq!(plain.measure(viewport()).unwrap(), Size::new(WIDTH, 450.0));

        let mut overlapping = node(&scroll, StickyHeaderSpec::new().overlap_headers(true));
        assert_eq!(
            overlapping.measure(viewport()).unwrap(),
            Size::new(WIDTH, 400.0)
        );
    }

    #[test]
    fn scroll_changes_are_applied_without_remeasure() {
        let scroll = ScrollState::new(0.0);
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = emitted.clone();
        let mut node = node(
            &scroll,
            StickyHeaderSpec::new().on_stuck_amount_changed(move |v| sink.borrow_mut().push(v)),
        );
        node.measure(viewport()).unwrap();
        node.place(1000.0);

        scroll.scroll_to(1300.0);
        assert!(node.is_scroll_dirty());
        assert!(node.apply_scroll());
        assert!(!node.apply_scroll());
        assert_eq!(node.layout_info().unwrap().header_offset, Point::new(0.0, 300.0));

        // 1300 -> 1320 stays fully stuck: no new emission.
        scroll.scroll_to(1320.0);
        node.apply_scroll();
        assert_eq!(*emitted.borrow(), vec![1.0, 0.0]);
    }

    #[test]
    fn dropping_the_node_unsubscribes() {
        let scroll = ScrollState::new(0.0);
        let node = node(&scroll, StickyHeaderSpec::new());
        assert_eq!(scroll.listener_count(), 1);
        drop(node);
        assert_eq!(scroll.listener_count(), 0);
    }

    #[test]
    fn hit_test_uses_the_stuck_position() {
        let scroll = ScrollState::new(1300.0);
        let mut node = node(&scroll, StickyHeaderSpec::new());
        node.measure(viewport()).unwrap();
        node.place(1000.0);

        // Header is painted at section y = 300; its natural slot is content now.
        let hit = node.hit_test(Point::new(10.0, 310.0)).unwrap();
        assert_eq!(hit.role, ChildRole::Header);
        assert_eq!(hit.local, Point::new(10.0, 10.0));

        let hit = node.hit_test(Point::new(10.0, 60.0)).unwrap();
        assert_eq!(hit.role, ChildRole::Content);
        assert_eq!(hit.local, Point::new(10.0, 10.0));
        assert_eq!(hit.node_id, 2);
    }

    #[test]
    fn tall_sections_are_not_clamped_to_the_viewport() {
        let scroll: Rc<dyn ScrollOffsetSource> = Rc::new(ScrollState::new(0.0));
        let mut node = StickyHeaderNode::new(
            StickyHeaderSpec::new(),
            Box::new(LeafChild::new(1, Size::new(WIDTH, 50.0))),
            Box::new(LeafChild::new(2, Size::new(WIDTH, 1000.0))),
            Some(scroll),
        )
        .unwrap();
        assert_eq!(node.measure(viewport()).unwrap(), Size::new(WIDTH, 1050.0));
        assert_eq!(node.layout_info().unwrap().section_size.height, 1050.0);
    }

    #[test]
    fn remeasure_waits_for_the_new_offset_before_notifying() {
        let scroll = ScrollState::new(440.0);
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = emitted.clone();
        let mut node = node(
            &scroll,
            StickyHeaderSpec::new().on_stuck_amount_changed(move |v| sink.borrow_mut().push(v)),
        );
        node.measure(viewport()).unwrap();
        node.place(450.0);
        assert_eq!(emitted.borrow().len(), 1);

        node.measure(viewport()).unwrap();
        assert_eq!(emitted.borrow().len(), 1);
        node.place(550.0);
        assert_eq!(emitted.borrow().len(), 2);
        assert_eq!(emitted.borrow()[1], 1.0);
    }

    #[test]
    fn same_offset_after_remeasure_still_lays_out() {
        let scroll = ScrollState::new(0.0);
        let mut node = node(&scroll, StickyHeaderSpec::new());
        node.measure(viewport()).unwrap();
        node.place(1000.0);
        scroll.scroll_to(1300.0);
        node.measure(viewport()).unwrap();
        node.place(1000.0);
        assert_eq!(node.stuck_amount(), Some(0.0));
        assert!(!node.is_scroll_dirty());
    }

    struct RecordingChild {
        role: ChildRole,
        size: Size,
        order: Rc<RefCell<Vec<ChildRole>>>,
    }

    impl LayoutChild for RecordingChild {
        fn node_id(&self) -> sticky_core::NodeId {
            self.role.index()
        }

        fn measure(&mut self, constraints: Constraints) -> Size {
            self.order.borrow_mut().push(self.role);
            constraints.constrain(self.size)
        }
    }

    #[test]
    fn content_is_measured_before_header() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let child = |role, height| {
            Box::new(RecordingChild {
                role,
                size: Size::new(WIDTH, height),
                order: order.clone(),
            })
        };
        let scroll: Rc<dyn ScrollOffsetSource> = Rc::new(ScrollState::new(0.0));
        let mut node = StickyHeaderNode::new(
            StickyHeaderSpec::new(),
            child(ChildRole::Header, 50.0),
            child(ChildRole::Content, 400.0),
            Some(scroll),
        )
        .unwrap();
        node.measure(viewport()).unwrap();
        node.mark_needs_measure();
        node.measure(viewport()).unwrap();
        assert_eq!(
            *order.borrow(),
            vec![
                ChildRole::Content,
                ChildRole::Header,
                ChildRole::Content,
                ChildRole::Header
            ]
        );
    }

    struct BrokenChild;

    impl LayoutChild for BrokenChild {
        fn node_id(&self) -> sticky_core::NodeId {
            9
        }

        fn measure(&mut self, _constraints: Constraints) -> Size {
            Size::new(10.0, f32::NAN)
        }
    }

    #[test]
    fn invalid_child_size_is_propagated() {
        let scroll: Rc<dyn ScrollOffsetSource> = Rc::new(ScrollState::new(0.0));
        let mut node = StickyHeaderNode::new(
            StickyHeaderSpec::new(),
            Box::new(LeafChild::new(1, Size::new(WIDTH, 50.0))),
            Box::new(BrokenChild),
            Some(scroll),
        )
        .unwrap();
        let err = node.measure(viewport()).unwrap_err();
        assert!(matches!(
            err,
            StickyError::InvalidChildSize {
                role: ChildRole::Content,
                ..
            }
        ));
        assert!(node.layout_info().is_none());
    }
}
