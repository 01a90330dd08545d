//! StickySectionColumn - vertical stack of sticky sections on one scroll source.
//!
//! The column plays the parent scrollable's part: it measures every section,
//! stacks them, hands each its top offset and keeps the [`ScrollState`]
//! bounds in sync with the stacked extent. Because all sections share the
//! scroll source, the next section's header pushes the previous one out.

use sticky_animation::FrameClock;
use sticky_core::{Constraints, Point, Size, StickyResult};
use sticky_foundation::sticky::{stack_sections, SectionStack};
use sticky_foundation::ScrollState;

use crate::expandable_sticky_header::ExpandableStickyHeader;
use crate::layout_child::{HitTarget, PaintScope};
use crate::pointer::{PointerEvent, PointerEventKind};
use crate::sticky_header_node::StickyHeaderNode;

/// A section the column can host.
pub trait StickySection {
    fn measure(&mut self, constraints: Constraints) -> StickyResult<Size>;

    fn place(&mut self, section_top: f32);

    /// Re-runs layout for a new scroll offset. Returns true if anything moved.
    fn apply_scroll(&mut self) -> bool;

    fn paint(&self, scope: &mut dyn PaintScope, origin: Point);

    fn hit_test(&self, point: Point) -> Option<HitTarget>;

    fn needs_measure(&self) -> bool;

    fn on_frame(&mut self, _frame_time_nanos: u64) -> bool {
        false
    }

    /// Pointer event in section coordinates. Returns true if consumed.
    fn on_pointer_event(&mut self, _event: PointerEvent) -> bool {
        false
    }
}

impl StickySection for StickyHeaderNode {
    fn measure(&mut self, constraints: Constraints) -> StickyResult<Size> {
        StickyHeaderNode::measure(self, constraints)
    }

    fn place(&mut self, section_top: f32) {
        StickyHeaderNode::place(self, section_top);
    }

    fn apply_scroll(&mut self) -> bool {
        StickyHeaderNode::apply_scroll(self)
    }

    fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        StickyHeaderNode::paint(self, scope, origin);
    }

    fn hit_test(&self, point: Point) -> Option<HitTarget> {
        StickyHeaderNode::hit_test(self, point)
    }

    fn needs_measure(&self) -> bool {
        StickyHeaderNode::needs_measure(self)
    }
}

impl StickySection for ExpandableStickyHeader {
    fn measure(&mut self, constraints: Constraints) -> StickyResult<Size> {
        ExpandableStickyHeader::measure(self, constraints)
    }

    fn place(&mut self, section_top: f32) {
        ExpandableStickyHeader::place(self, section_top);
    }

    fn apply_scroll(&mut self) -> bool {
        ExpandableStickyHeader::apply_scroll(self)
    }

    fn paint(&self, scope: &mut dyn PaintScope, origin: Point) {
        ExpandableStickyHeader::paint(self, scope, origin);
    }

    fn hit_test(&self, point: Point) -> Option<HitTarget> {
        ExpandableStickyHeader::hit_test(self, point)
    }

    fn needs_measure(&self) -> bool {
        ExpandableStickyHeader::needs_measure(self)
    }

    fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        ExpandableStickyHeader::on_frame(self, frame_time_nanos)
    }

    fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        ExpandableStickyHeader::on_pointer_event(self, event)
    }
}

/// Hit result of the column: which section, and what inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionHit {
    pub section: usize,
    pub target: HitTarget,
}

/// Vertical column of sticky sections sharing one [`ScrollState`].
pub struct StickySectionColumn {
    sections: Vec<Box<dyn StickySection>>,
    scroll: ScrollState,
    spacing: f32,
    before_padding: f32,
    viewport: Size,
    stack: SectionStack,
    hovered: Option<usize>,
    pointer_capture: Option<usize>,
}

impl StickySectionColumn {
    pub fn new(scroll: ScrollState) -> Self {
        Self {
            sections: Vec::new(),
            scroll,
            spacing: 0.0,
            before_padding: 0.0,
            viewport: Size::ZERO,
            stack: SectionStack::default(),
            hovered: None,
            pointer_capture: None,
        }
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn before_padding(mut self, padding: f32) -> Self {
        self.before_padding = padding;
        self
    }

    pub fn push(&mut self, section: Box<dyn StickySection>) {
        self.sections.push(section);
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn stack(&self) -> &SectionStack {
        &self.stack
    }

    pub fn section(&self, index: usize) -> Option<&dyn StickySection> {
        self.sections.get(index).map(|section| section.as_ref())
    }

    /// True if any section must be measured again before painting.
    pub fn needs_layout(&self) -> bool {
        self.sections.iter().any(|section| section.needs_measure())
    }

    /// Full pass: measures, stacks and places every section.
    pub fn layout(&mut self, viewport: Size) -> StickyResult<()> {
        self.viewport = viewport;
        let constraints = Constraints::loose(viewport)
            .with_exact_width(viewport.width)
            .with_unbounded_height();
        let mut extents = Vec::with_capacity(self.sections.len());
        for section in &mut self.sections {
            extents.push(section.measure(constraints)?.height);
        }
        self.stack = stack_sections(extents, self.spacing, self.before_padding);

        self.scroll.set_viewport_size(viewport.height);
        self.scroll
            .set_max_value(self.stack.max_scroll(viewport.height));

        for (section, placement) in self.sections.iter_mut().zip(&self.stack.placements) {
            section.place(placement.top);
        }
        // Setting the max may have coerced the offset.
        self.apply_scroll();
        log::trace!(
            "StickySectionColumn: {} sections, extent {}",
            self.sections.len(),
            self.stack.total_extent
        );
        Ok(())
    }

    /// Applies the current scroll offset to every section.
    pub fn apply_scroll(&mut self) -> bool {
        let mut moved = false;
        for section in &mut self.sections {
            moved |= section.apply_scroll();
        }
        moved
    }

    /// Advances animations, re-laying out if a section size changed.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> StickyResult<bool> {
        let mut animating = false;
        for section in &mut self.sections {
            animating |= section.on_frame(frame_time_nanos);
        }
        if self.needs_layout() {
            self.layout(self.viewport)?;
        }
        Ok(animating)
    }

    /// Runs [`on_frame`](Self::on_frame) at the clock's current time.
    pub fn on_clock_frame(&mut self, clock: &FrameClock) -> StickyResult<bool> {
        self.on_frame(clock.frame_time_nanos())
    }

    /// Viewport-space origin of a section.
    fn section_origin(&self, index: usize) -> Option<Point> {
        let placement = self.stack.placements.get(index)?;
        Some(Point::new(0.0, placement.top - self.scroll.value()))
    }

    /// Paints visible sections top to bottom so later headers cover earlier ones.
    pub fn paint(&self, scope: &mut dyn PaintScope) {
        let range = self
            .stack
            .visible_range(self.scroll.value(), self.viewport.height);
        for index in range {
            let (Some(section), Some(origin)) =
                (self.sections.get(index), self.section_origin(index))
            else {
                continue;
            };
            section.paint(scope, origin);
        }
    }

    /// Hit-tests a viewport point, last painted section first.
    pub fn hit_test(&self, point: Point) -> Option<SectionHit> {
        let range = self
            .stack
            .visible_range(self.scroll.value(), self.viewport.height);
        range.rev().find_map(|index| {
            let origin = self.section_origin(index)?;
            let target = self.sections.get(index)?.hit_test(point.relative_to(origin))?;
            Some(SectionHit {
                section: index,
                target,
            })
        })
    }

    /// Routes a viewport pointer event to the section under it.
    ///
    /// A section that consumed `Down` keeps receiving events until `Up`.
    /// Sections the pointer leaves get an `Exit`.
    pub fn dispatch_pointer(&mut self, event: PointerEvent) -> bool {
        let under = self.hit_test(event.position).map(|hit| hit.section);
        let receiver = self.pointer_capture.or(under);

        if self.hovered != under {
            if let Some(previous) = self.hovered {
                self.send(previous, PointerEvent::new(PointerEventKind::Exit, event.position));
            }
            self.hovered = under;
        }

        let Some(index) = receiver else {
            return false;
        };
        let consumed = self.send(index, event);
        match event.kind {
            PointerEventKind::Down if consumed => self.pointer_capture = Some(index),
            PointerEventKind::Up | PointerEventKind::Exit => self.pointer_capture = None,
            _ => {}
        }
        consumed
    }

    fn send(&mut self, index: usize, event: PointerEvent) -> bool {
        let Some(origin) = self.section_origin(index) else {
            return false;
        };
        match self.sections.get_mut(index) {
            Some(section) => section.on_pointer_event(event.relative_to(origin)),
            None => false,
        }
    }

    /// Scrolls by `delta` and applies the result. Returns the consumed delta.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let consumed = self.scroll.consume_scroll_delta(delta);
        self.apply_scroll();
        consumed
    }
}

impl std::fmt::Debug for StickySectionColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickySectionColumn")
            .field("sections", &self.sections.len())
            .field("scroll", &self.scroll.value())
            .field("stack", &self.stack)
            .finish()
    }
}
