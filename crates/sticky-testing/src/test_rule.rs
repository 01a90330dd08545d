use std::rc::Rc;
use std::time::Duration;

use sticky_core::{FrameCallbackQueue, MemorySaveableRegistry, Point, Size};
use sticky_foundation::ScrollState;
use sticky_ui::{
    PointerEvent, PointerEventKind, SectionEnvironment, SectionHit, StickySection,
    StickySectionColumn,
};

use crate::test_renderer::RecordingPaintScope;

const MAX_SETTLE_FRAMES: usize = 100;

/// Drives a column of sticky sections frame by frame.
///
/// The scroll state, post-frame queue and saveable registry outlive
/// [`set_content`](Self::set_content), so tearing the content down and
/// building it again behaves like a host recreating its widgets.
pub struct StickyTestRule {
    scroll: ScrollState,
    frame_queue: FrameCallbackQueue,
    registry: MemorySaveableRegistry,
    viewport: Size,
    before_padding: f32,
    frame_time_nanos: u64,
    column: StickySectionColumn,
}

impl StickyTestRule {
    pub fn new(viewport: Size) -> Self {
        crate::init_test_logging();
        let scroll = ScrollState::new(0.0);
        Self {
            column: StickySectionColumn::new(scroll.clone()),
            scroll,
            frame_queue: FrameCallbackQueue::new(),
            registry: MemorySaveableRegistry::new(),
            viewport,
            before_padding: 0.0,
            frame_time_nanos: 0,
        }
    }

    /// Empty space above the first section.
    pub fn with_before_padding(mut self, padding: f32) -> Self {
        self.before_padding = padding;
        self
    }

    /// Environment sections are attached with.
    pub fn env(&self) -> SectionEnvironment {
        SectionEnvironment::new(self.frame_queue.clone(), Rc::new(self.registry.clone()))
            .with_scroll(Rc::new(self.scroll.clone()))
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn frame_queue(&self) -> &FrameCallbackQueue {
        &self.frame_queue
    }

    pub fn registry(&self) -> &MemorySaveableRegistry {
        &self.registry
    }

    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    pub fn column(&self) -> &StickySectionColumn {
        &self.column
    }

    pub fn column_mut(&mut self) -> &mut StickySectionColumn {
        &mut self.column
    }

    /// Replaces the content, dropping the previous sections first.
    pub fn set_content(
        &mut self,
        content: impl FnOnce(&SectionEnvironment) -> Vec<Box<dyn StickySection>>,
    ) {
        self.column =
            StickySectionColumn::new(self.scroll.clone()).before_padding(self.before_padding);
        let env = self.env();
        for section in content(&env) {
            self.column.push(section);
        }
        self.layout();
        self.await_idle();
    }

    /// Removes all content, as when the host tears the screen down.
    pub fn clear_content(&mut self) {
        self.column = StickySectionColumn::new(self.scroll.clone());
        self.frame_queue.run_post_frame();
    }

    fn layout(&mut self) {
        if let Err(err) = self.column.layout(self.viewport) {
            panic!("layout failed: {err}");
        }
    }

    /// Runs post-frame work and layout until nothing is pending.
    pub fn await_idle(&mut self) {
        let mut frames = 0;
        loop {
            let ran = self.frame_queue.run_post_frame();
            if self.column.needs_layout() {
                self.layout();
            } else if ran == 0 {
                if frames > 0 {
                    log::trace!("StickyTestRule: settled after {frames} frame(s)");
                }
                break;
            }
            frames += 1;
            if frames > MAX_SETTLE_FRAMES {
                panic!("sections failed to settle after {MAX_SETTLE_FRAMES} frames");
            }
        }
    }

    /// Advances the frame clock by `delta` and runs one frame.
    pub fn advance_frame(&mut self, delta: Duration) {
        self.frame_time_nanos += delta.as_nanos() as u64;
        match self.column.on_frame(self.frame_time_nanos) {
            Ok(_) => {}
            Err(err) => panic!("frame at {}ns failed: {err}", self.frame_time_nanos),
        }
        self.await_idle();
    }

    /// Runs frames of `frame` length until `total` has elapsed.
    pub fn advance_time(&mut self, total: Duration, frame: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            self.advance_frame(frame);
            elapsed += frame;
        }
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll.scroll_to(offset);
        self.column.apply_scroll();
        self.await_idle();
    }

    pub fn perform_touch_input(&mut self, position: Point, kind: PointerEventKind) -> bool {
        let consumed = self
            .column
            .dispatch_pointer(PointerEvent::new(kind, position));
        self.await_idle();
        consumed
    }

    /// Presses and releases at `position` (viewport coordinates).
    pub fn perform_click(&mut self, position: Point) -> bool {
        let down = self.perform_touch_input(position, PointerEventKind::Down);
        let up = self.perform_touch_input(position, PointerEventKind::Up);
        down && up
    }

    pub fn hit_test(&self, position: Point) -> Option<SectionHit> {
        self.column.hit_test(position)
    }

    pub fn paint(&self) -> RecordingPaintScope {
        let mut scope = RecordingPaintScope::new();
        self.column.paint(&mut scope);
        scope
    }
}
