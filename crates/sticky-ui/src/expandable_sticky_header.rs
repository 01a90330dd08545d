//! ExpandableStickyHeader - a sticky section whose content folds away.
//!
//! Two animations meet here. The sticky node reports stuck amounts while the
//! user scrolls, and the expander animates the content height after a tap.
//! Header visuals depend on both, so every change funnels into one coalesced
//! rebuild posted to the [`FrameCallbackQueue`]. The rebuild never runs
//! inside the layout pass that produced the new value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sticky_animation::{CurveEvaluator, StandardCurves};
use sticky_core::{
    ChildRole, Constraints, FrameCallbackId, FrameCallbackQueue, NodeId, Point,
    SaveableStateRegistry, SectionKey, Size, StickyError, StickyResult,
};
use sticky_foundation::scroll::ScrollOffsetSource;
use sticky_foundation::sticky::HeaderChildLayout;

use crate::expandable_content::ExpandableContent;
use crate::expander::{ExpanderController, ExpanderPhase, ExpanderSpec, ExpanderState};
use crate::layout_child::{HitTarget, LayoutChild, PaintScope};
use crate::pointer::{PointerEvent, PointerEventKind};
use crate::sticky_header_node::{StickyHeaderNode, StickyHeaderSpec};

/// Builds the header visual from `(stuck_amount, is_hovering)`.
pub type HeaderBuilder = Box<dyn Fn(f32, bool) -> Box<dyn LayoutChild>>;

/// How the header visual is defined.
pub enum HeaderContent {
    /// Rebuilt whenever the stuck amount or hover state changes.
    Builder(HeaderBuilder),
    /// Built once by the caller.
    Fixed(Box<dyn LayoutChild>),
}

impl HeaderContent {
    /// Accepts exactly one of the two definitions.
    pub fn from_parts(
        builder: Option<HeaderBuilder>,
        fixed: Option<Box<dyn LayoutChild>>,
    ) -> StickyResult<Self> {
        match (builder, fixed) {
            (Some(builder), None) => Ok(HeaderContent::Builder(builder)),
            (None, Some(fixed)) => Ok(HeaderContent::Fixed(fixed)),
            (builder, fixed) => Err(StickyError::InvalidHeaderConfiguration {
                builder: builder.is_some(),
                fixed: fixed.is_some(),
            }),
        }
    }
}

/// Header styling derived from the expander and the stuck amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderChrome {
    /// Chevron rotation in turns.
    pub chevron_turns: f32,
    /// Radius of the header corners on the side the content attaches to.
    pub corner_radius: f32,
    pub hovering: bool,
    pub enabled: bool,
    pub stuck_amount: f32,
}

/// Ambient services a section is attached with.
#[derive(Clone)]
pub struct SectionEnvironment {
    /// Nearest enclosing scrollable, resolved by the host.
    pub scroll: Option<Rc<dyn ScrollOffsetSource>>,
    pub frame_queue: FrameCallbackQueue,
    pub registry: Rc<dyn SaveableStateRegistry>,
    pub curves: Rc<dyn CurveEvaluator>,
}

impl SectionEnvironment {
    pub fn new(frame_queue: FrameCallbackQueue, registry: Rc<dyn SaveableStateRegistry>) -> Self {
        Self {
            scroll: None,
            frame_queue,
            registry,
            curves: Rc::new(StandardCurves),
        }
    }

    pub fn with_scroll(mut self, scroll: Rc<dyn ScrollOffsetSource>) -> Self {
        self.scroll = Some(scroll);
        self
    }

    pub fn with_curves(mut self, curves: Rc<dyn CurveEvaluator>) -> Self {
        self.curves = curves;
        self
    }
}

impl std::fmt::Debug for SectionEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionEnvironment")
            .field("scroll", &self.scroll.is_some())
            .field("pending_frame_tasks", &self.frame_queue.pending_len())
            .finish()
    }
}

/// Configuration for an expandable sticky header.
#[derive(Clone, Debug)]
pub struct ExpandableStickyHeaderSpec {
    pub sticky: StickyHeaderSpec,
    pub expander: ExpanderSpec,
    /// Corner radius of the header while collapsed.
    pub corner_radius: f32,
}

impl Default for ExpandableStickyHeaderSpec {
    fn default() -> Self {
        Self {
            sticky: StickyHeaderSpec::default(),
            expander: ExpanderSpec::default(),
            corner_radius: 12.0,
        }
    }
}

impl ExpandableStickyHeaderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sticky(mut self, sticky: StickyHeaderSpec) -> Self {
        self.sticky = sticky;
        self
    }

    pub fn expander(mut self, expander: ExpanderSpec) -> Self {
        self.expander = expander;
        self
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }
}

struct HeaderSlotState {
    builder: Option<HeaderBuilder>,
    child: Box<dyn LayoutChild>,
}

/// State shared by the section, its header slot, and queued rebuilds.
struct HeaderShared {
    slot: RefCell<HeaderSlotState>,
    expander: Rc<RefCell<ExpanderController>>,
    frame_queue: FrameCallbackQueue,
    corner_radius: f32,
    stuck_amount: Cell<f32>,
    chrome: Cell<HeaderChrome>,
    pending_rebuild: Cell<Option<FrameCallbackId>>,
    /// A rebuild replaced the header child since the last measure.
    header_replaced: Cell<bool>,
    rebuild_count: Cell<u64>,
}

impl HeaderShared {
    fn compute_chrome(&self) -> HeaderChrome {
        let expander = self.expander.borrow();
        HeaderChrome {
            chevron_turns: expander.chevron_turns(),
            corner_radius: self.corner_radius * (1.0 - expander.animation_progress()),
            hovering: expander.is_hovering(),
            enabled: expander.is_enabled(),
            stuck_amount: self.stuck_amount.get(),
        }
    }

    /// Posts a rebuild unless one is already pending.
    fn schedule_rebuild(self: &Rc<Self>) {
        if self.pending_rebuild.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let id = self.frame_queue.post(move || {
            if let Some(shared) = weak.upgrade() {
                shared.rebuild();
            }
        });
        self.pending_rebuild.set(Some(id));
    }

    fn cancel_rebuild(&self) {
        if let Some(id) = self.pending_rebuild.take() {
            self.frame_queue.cancel(id);
        }
    }

    fn rebuild(&self) {
        self.pending_rebuild.set(None);
        self.rebuild_count.set(self.rebuild_count.get() + 1);
        let chrome = self.compute_chrome();
        self.chrome.set(chrome);

        let mut slot = self.slot.borrow_mut();
        let HeaderSlotState { builder, child } = &mut *slot;
        if let Some(builder) = builder {
            log::trace!(
                "ExpandableStickyHeader: rebuilding header (stuck {}, hovering {})",
                chrome.stuck_amount,
                chrome.hovering
            );
            *child = builder(chrome.stuck_amount, chrome.hovering);
            self.header_replaced.set(true);
        }
    }
}

/// Header child handed to the sticky node. Forwards to whatever the last
/// rebuild produced.
struct HeaderSlot {
    shared: Rc<HeaderShared>,
}

impl LayoutChild for HeaderSlot {
    fn node_id(&self) -> NodeId {
        self.shared.slot.borrow().child.node_id()
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        self.shared.header_replaced.set(false);
        self.shared.slot.borrow_mut().child.measure(constraints)
    }

    fn hit_test(&self, local: Point) -> bool {
        self.shared.slot.borrow().child.hit_test(local)
    }

    fn is_focusable(&self) -> bool {
        self.shared.slot.borrow().child.is_focusable()
    }

    fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        self.shared.slot.borrow().child.paint(scope, origin);
    }
}

/// Sticky section with a tappable header that expands and collapses its content.
pub struct ExpandableStickyHeader {
    node: StickyHeaderNode,
    shared: Rc<HeaderShared>,
    expander: Rc<RefCell<ExpanderController>>,
    pressed: bool,
}

impl ExpandableStickyHeader {
    /// Builds the section.
    ///
    /// Exactly one of `header_builder` and `header` must be given. The open
    /// state is restored from `env.registry` under `key`.
    pub fn new(
        key: SectionKey,
        header_builder: Option<HeaderBuilder>,
        header: Option<Box<dyn LayoutChild>>,
        content: Box<dyn LayoutChild>,
        spec: ExpandableStickyHeaderSpec,
        env: &SectionEnvironment,
    ) -> StickyResult<Self> {
        let header = HeaderContent::from_parts(header_builder, header)?;
        let expander = Rc::new(RefCell::new(ExpanderController::with_curves(
            key,
            spec.expander,
            env.registry.clone(),
            env.curves.clone(),
        )));

        let initial_stuck = 1.0;
        let slot = match header {
            HeaderContent::Builder(builder) => HeaderSlotState {
                child: builder(initial_stuck, false),
                builder: Some(builder),
            },
            HeaderContent::Fixed(child) => HeaderSlotState {
                builder: None,
                child,
            },
        };

        let shared = Rc::new(HeaderShared {
            slot: RefCell::new(slot),
            expander: expander.clone(),
            frame_queue: env.frame_queue.clone(),
            corner_radius: spec.corner_radius,
            stuck_amount: Cell::new(initial_stuck),
            chrome: Cell::new(HeaderChrome {
                chevron_turns: 0.0,
                corner_radius: spec.corner_radius,
                hovering: false,
                enabled: true,
                stuck_amount: initial_stuck,
            }),
            pending_rebuild: Cell::new(None),
            header_replaced: Cell::new(false),
            rebuild_count: Cell::new(0),
        });
        shared.chrome.set(shared.compute_chrome());

        let mut sticky = spec.sticky;
        let forward = sticky.on_stuck_amount_changed.take();
        let weak = Rc::downgrade(&shared);
        sticky.on_stuck_amount_changed = Some(Rc::new(move |amount: f32| {
            if let Some(shared) = weak.upgrade() {
                shared.stuck_amount.set(amount);
                shared.schedule_rebuild();
            }
            if let Some(forward) = &forward {
                forward(amount);
            }
        }));

        let node = StickyHeaderNode::new(
            sticky,
            Box::new(HeaderSlot {
                shared: shared.clone(),
            }),
            Box::new(ExpandableContent::new(content, expander.clone())),
            env.scroll.clone(),
        )?;

        Ok(Self {
            node,
            shared,
            expander,
            pressed: false,
        })
    }

    pub fn node(&self) -> &StickyHeaderNode {
        &self.node
    }

    pub fn measure(&mut self, constraints: Constraints) -> StickyResult<Size> {
        self.node.measure(constraints)
    }

    pub fn place(&mut self, section_top: f32) {
        self.node.place(section_top);
    }

    pub fn apply_scroll(&mut self) -> bool {
        self.node.apply_scroll()
    }

    pub fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        self.node.paint(scope, origin);
    }

    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        self.node.hit_test(point)
    }

    pub fn needs_measure(&self) -> bool {
        self.node.needs_measure() || self.shared.header_replaced.get()
    }

    pub fn layout_info(&self) -> Option<HeaderChildLayout> {
        self.node.layout_info()
    }

    /// Advances the expand/collapse animation.
    ///
    /// Returns true if the content height moved, in which case the section
    /// needs a fresh measure before the next paint.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        let moved = self.expander.borrow_mut().on_frame(frame_time_nanos);
        if moved {
            self.node.mark_needs_measure();
            self.shared.schedule_rebuild();
        }
        moved
    }

    /// Handles a pointer event in section coordinates. Returns true if consumed.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        let over_header = event.kind != PointerEventKind::Exit
            && self
                .node
                .child_bounds(ChildRole::Header)
                .is_some_and(|bounds| bounds.contains(event.position));

        if self.expander.borrow_mut().set_hovering(over_header) {
            self.shared.schedule_rebuild();
        }

        match event.kind {
            PointerEventKind::Down => {
                self.pressed = over_header;
                over_header
            }
            PointerEventKind::Up => {
                let was_pressed = std::mem::replace(&mut self.pressed, false);
                if !(was_pressed && over_header) {
                    return false;
                }
                let toggled = self.expander.borrow_mut().tap();
                if toggled {
                    self.after_toggle();
                }
                true
            }
            PointerEventKind::Move => false,
            PointerEventKind::Exit => {
                self.pressed = false;
                false
            }
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expander.borrow().is_open()
    }

    /// Opens or closes the section regardless of the enabled flag.
    pub fn set_expanded(&mut self, expanded: bool) {
        if self.expander.borrow().is_open() == expanded {
            return;
        }
        self.expander.borrow_mut().set_expanded(expanded);
        self.after_toggle();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.expander.borrow_mut().set_enabled(enabled);
        self.shared.schedule_rebuild();
    }

    fn after_toggle(&mut self) {
        self.node.mark_needs_measure();
        self.shared.schedule_rebuild();
    }

    pub fn state(&self) -> ExpanderState {
        self.expander.borrow().state()
    }

    pub fn phase(&self) -> ExpanderPhase {
        self.expander.borrow().phase()
    }

    /// Chrome as of the last rebuild.
    pub fn chrome(&self) -> HeaderChrome {
        self.shared.chrome.get()
    }

    /// Latest stuck amount reported by the sticky node.
    pub fn stuck_amount(&self) -> f32 {
        self.shared.stuck_amount.get()
    }

    pub fn has_pending_rebuild(&self) -> bool {
        self.shared.pending_rebuild.get().is_some()
    }

    /// Number of header rebuilds that have run.
    pub fn rebuild_count(&self) -> u64 {
        self.shared.rebuild_count.get()
    }

    /// Removes the section for good, dropping its persisted open state and
    /// any header rebuild still queued for the next frame.
    pub fn discard(self) {
        let Self {
            node,
            shared,
            expander,
            ..
        } = self;
        shared.cancel_rebuild();
        drop(node);
        drop(shared);
        match Rc::try_unwrap(expander) {
            Ok(expander) => expander.into_inner().discard(),
            Err(_) => log::warn!("ExpandableStickyHeader: expander still shared, state kept"),
        }
    }
}

impl std::fmt::Debug for ExpandableStickyHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandableStickyHeader")
            .field("node", &self.node)
            .field("expander", &self.expander.borrow())
            .field("chrome", &self.shared.chrome.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_child::LeafChild;
    use std::time::Duration;
    use sticky_animation::Easing;
    use sticky_core::MemorySaveableRegistry;
    use sticky_foundation::ScrollState;

    const WIDTH: f32 = 320.0;
    const MS: u64 = 1_000_000;

    struct Fixture {
        scroll: ScrollState,
        queue: FrameCallbackQueue,
        registry: MemorySaveableRegistry,
        builds: Rc<RefCell<Vec<(f32, bool)>>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scroll: ScrollState::new(0.0),
                queue: FrameCallbackQueue::new(),
                registry: MemorySaveableRegistry::new(),
                builds: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn env(&self) -> SectionEnvironment {
            SectionEnvironment::new(self.queue.clone(), Rc::new(self.registry.clone()))
                .with_scroll(Rc::new(self.scroll.clone()))
        }

        fn builder(&self) -> HeaderBuilder {
            let builds = self.builds.clone();
            Box::new(move |stuck: f32, hovering: bool| {
                builds.borrow_mut().push((stuck, hovering));
                Box::new(LeafChild::new(1, Size::new(WIDTH, 50.0))) as Box<dyn LayoutChild>
            })
        }

        fn section(&self) -> ExpandableStickyHeader {
            ExpandableStickyHeader::new(
                SectionKey::from("section"),
                Some(self.builder()),
                None,
                Box::new(LeafChild::new(2, Size::new(WIDTH, 400.0))),
                ExpandableStickyHeaderSpec::new().expander(
                    ExpanderSpec::new()
                        .animation_duration(Duration::from_millis(100))
                        .animation_curve(Easing::Linear),
                ),
                &self.env(),
            )
            .unwrap()
        }
    }

    fn viewport() -> Constraints {
        Constraints::loose(Size::new(WIDTH, 600.0))
    }

    #[test]
    fn rejects_both_or_neither_header_definition() {
        let fixture = Fixture::new();
        let content =
            || Box::new(LeafChild::new(2, Size::new(WIDTH, 10.0))) as Box<dyn LayoutChild>;

        let neither = ExpandableStickyHeader::new(
            SectionKey::from("a"),
            None,
            None,
            content(),
            ExpandableStickyHeaderSpec::new(),
            &fixture.env(),
        )
        .unwrap_err();
        assert_eq!(
            neither,
            StickyError::InvalidHeaderConfiguration {
                builder: false,
                fixed: false
            }
        );

        let both = ExpandableStickyHeader::new(
            SectionKey::from("b"),
            Some(fixture.builder()),
            Some(Box::new(LeafChild::new(1, Size::new(WIDTH, 50.0)))),
            content(),
            ExpandableStickyHeaderSpec::new(),
            &fixture.env(),
        )
        .unwrap_err();
        assert_eq!(
            both,
            StickyError::InvalidHeaderConfiguration {
                builder: true,
                fixed: true
            }
        );
    }

    #[test]
    fn stuck_changes_coalesce_into_one_rebuild() {
        let fixture = Fixture::new();
        let mut section = fixture.section();
        assert_eq!(section.measure(viewport()).unwrap(), Size::new(WIDTH, 50.0));
        section.place(1000.0);
        assert!(section.has_pending_rebuild());

        fixture.scroll.scroll_to(980.0);
        section.apply_scroll();
        assert_eq!(fixture.queue.pending_len(), 1);
        assert_eq!(fixture.builds.borrow().len(), 1);

        fixture.queue.run_post_frame();
        assert_eq!(*fixture.builds.borrow(), vec![(1.0, false), (0.4, false)]);
        assert_eq!(section.rebuild_count(), 1);
        assert!(section.needs_measure());
        assert!((section.chrome().stuck_amount - 0.4).abs() < 1e-6);
    }

    #[test]
    fn tap_on_header_expands_content() {
        let fixture = Fixture::new();
        let mut section = fixture.section();
        section.measure(viewport()).unwrap();
        section.place(0.0);

        let at = Point::new(10.0, 10.0);
        assert!(section.on_pointer_event(PointerEvent::new(PointerEventKind::Down, at)));
        assert!(section.on_pointer_event(PointerEvent::new(PointerEventKind::Up, at)));
        assert!(section.is_expanded());
        assert!(section.state().is_hovering);

        section.on_frame(0);
        assert!(section.on_frame(50 * MS));
        assert!(section.needs_measure());
        assert_eq!(section.measure(viewport()).unwrap(), Size::new(WIDTH, 250.0));

        section.on_frame(100 * MS);
        assert_eq!(section.phase(), ExpanderPhase::Expanded);
        fixture.queue.run_post_frame();
        assert_eq!(section.chrome().chevron_turns, 0.5);
        assert_eq!(section.chrome().corner_radius, 0.0);
    }

    #[test]
    fn press_outside_header_does_not_toggle() {
        let fixture = Fixture::new();
        let mut section = fixture.section();
        section.measure(viewport()).unwrap();
        section.place(0.0);

        let outside = Point::new(10.0, 80.0);
        assert!(!section.on_pointer_event(PointerEvent::new(PointerEventKind::Down, outside)));
        assert!(!section.on_pointer_event(PointerEvent::new(
            PointerEventKind::Up,
            Point::new(10.0, 10.0)
        )));
        assert!(!section.is_expanded());
    }

    #[test]
    fn discard_drops_persisted_state_and_queued_rebuild() {
        let fixture = Fixture::new();
        let mut section = fixture.section();
        section.set_expanded(true);
        assert_eq!(fixture.registry.len(), 1);
        assert_eq!(fixture.queue.pending_len(), 1);
        section.discard();
        assert!(fixture.registry.is_empty());
        assert_eq!(fixture.queue.pending_len(), 0);
        assert_eq!(fixture.builds.borrow().len(), 1);
    }
}
