//! Expand/collapse state machine for expandable section headers.
//!
//! `is_open` is the source of truth and is persisted per section. The height
//! animation follows it: toggling retargets the running animation from its
//! current value, and `on_state_changed` fires once when the animation lands.

use std::rc::Rc;
use std::time::Duration;

use sticky_animation::{
    AnimationSpec, CurveEvaluator, Easing, ProgressAnimation, StandardCurves, TickResult,
};
use sticky_core::{SaveableStateRegistry, SectionKey};

/// Which way the content unfolds relative to the header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpanderDirection {
    /// Content is revealed top edge first, growing downward.
    #[default]
    Down,
    /// Content is revealed bottom edge first, growing upward.
    Up,
}

/// Logical target of an expand/collapse animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpanderTarget {
    Expanded,
    Collapsed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpanderPhase {
    Collapsed,
    Expanded,
    Animating(ExpanderTarget),
}

/// Snapshot handed to header builders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpanderState {
    pub is_open: bool,
    /// Eased height progress in `[0, 1]`.
    pub animation_progress: f32,
    pub is_hovering: bool,
}

/// Configuration for an expander.
#[derive(Clone)]
pub struct ExpanderSpec {
    pub direction: ExpanderDirection,
    pub initially_expanded: bool,
    pub animation: AnimationSpec,
    /// Disables tap toggling. Programmatic toggling keeps working.
    pub enabled: bool,
    pub on_state_changed: Option<Rc<dyn Fn(bool)>>,
}

impl Default for ExpanderSpec {
    fn default() -> Self {
        Self {
            direction: ExpanderDirection::Down,
            initially_expanded: false,
            animation: AnimationSpec::default(),
            enabled: true,
            on_state_changed: None,
        }
    }
}

impl ExpanderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, direction: ExpanderDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn initially_expanded(mut self, expanded: bool) -> Self {
        self.initially_expanded = expanded;
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation.duration = duration;
        self
    }

    pub fn animation_curve(mut self, easing: Easing) -> Self {
        self.animation.easing = easing;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_state_changed(mut self, callback: impl Fn(bool) + 'static) -> Self {
        self.on_state_changed = Some(Rc::new(callback));
        self
    }
}

impl std::fmt::Debug for ExpanderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpanderSpec")
            .field("direction", &self.direction)
            .field("initially_expanded", &self.initially_expanded)
            .field("animation", &self.animation)
            .field("enabled", &self.enabled)
            .field("on_state_changed", &self.on_state_changed.is_some())
            .finish()
    }
}

/// Open/closed state plus the height animation of one section.
pub struct ExpanderController {
    key: SectionKey,
    registry: Rc<dyn SaveableStateRegistry>,
    curves: Rc<dyn CurveEvaluator>,
    spec: ExpanderSpec,
    is_open: bool,
    animation: ProgressAnimation,
    is_hovering: bool,
}

impl ExpanderController {
    /// Restores `is_open` from the registry, falling back to `initially_expanded`.
    pub fn new(key: SectionKey, spec: ExpanderSpec, registry: Rc<dyn SaveableStateRegistry>) -> Self {
        Self::with_curves(key, spec, registry, Rc::new(StandardCurves))
    }

    pub fn with_curves(
        key: SectionKey,
        spec: ExpanderSpec,
        registry: Rc<dyn SaveableStateRegistry>,
        curves: Rc<dyn CurveEvaluator>,
    ) -> Self {
        let restored = registry.read_bool(&key);
        let is_open = restored.unwrap_or(spec.initially_expanded);
        log::trace!(
            "ExpanderController[{}]: open={} (restored={})",
            key,
            is_open,
            restored.is_some()
        );
        let animation = ProgressAnimation::new(if is_open { 1.0 } else { 0.0 }, spec.animation);
        Self {
            key,
            registry,
            curves,
            spec,
            is_open,
            animation,
            is_hovering: false,
        }
    }

    pub fn key(&self) -> &SectionKey {
        &self.key
    }

    pub fn spec(&self) -> &ExpanderSpec {
        &self.spec
    }

    /// Applies new configuration without touching the open state.
    pub fn update_spec(&mut self, spec: ExpanderSpec) {
        self.animation.set_spec(spec.animation);
        self.spec = spec;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_enabled(&self) -> bool {
        self.spec.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.spec.enabled = enabled;
    }

    pub fn direction(&self) -> ExpanderDirection {
        self.spec.direction
    }

    pub fn phase(&self) -> ExpanderPhase {
        match (self.animation.is_running(), self.is_open) {
            (true, true) => ExpanderPhase::Animating(ExpanderTarget::Expanded),
            (true, false) => ExpanderPhase::Animating(ExpanderTarget::Collapsed),
            (false, true) => ExpanderPhase::Expanded,
            (false, false) => ExpanderPhase::Collapsed,
        }
    }

    /// Eased height progress.
    pub fn animation_progress(&self) -> f32 {
        self.animation.eased_value_with(self.curves.as_ref())
    }

    /// Linear controller value, before the curve.
    pub fn linear_progress(&self) -> f32 {
        self.animation.value()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    pub fn is_hovering(&self) -> bool {
        self.is_hovering
    }

    /// Returns true if the hover state changed.
    pub fn set_hovering(&mut self, hovering: bool) -> bool {
        let changed = self.is_hovering != hovering;
        self.is_hovering = hovering;
        changed
    }

    pub fn state(&self) -> ExpanderState {
        ExpanderState {
            is_open: self.is_open,
            animation_progress: self.animation_progress(),
            is_hovering: self.is_hovering,
        }
    }

    /// Content must still be measured while it has any visible height.
    pub fn content_visible(&self) -> bool {
        self.animation.value() > 0.0
    }

    /// Content accepts pointer input and focus only while open or opening.
    pub fn content_interactive(&self) -> bool {
        self.is_open
    }

    /// Chevron rotation in turns.
    pub fn chevron_turns(&self) -> f32 {
        let progress = self.animation_progress();
        match self.spec.direction {
            ExpanderDirection::Down => 0.5 * progress,
            ExpanderDirection::Up => 0.5 * (1.0 - progress),
        }
    }

    /// User tap on the header. Ignored while disabled.
    pub fn tap(&mut self) -> bool {
        if !self.spec.enabled {
            log::debug!("ExpanderController[{}]: tap ignored while disabled", self.key);
            return false;
        }
        self.toggle();
        true
    }

    pub fn toggle(&mut self) {
        self.set_expanded(!self.is_open);
    }

    /// Programmatic open/close. A no-op when already at or heading to `expanded`.
    pub fn set_expanded(&mut self, expanded: bool) {
        if self.is_open == expanded {
            return;
        }
        self.is_open = expanded;
        self.registry.write_bool(&self.key, expanded);
        let target = if expanded { 1.0 } else { 0.0 };
        log::debug!(
            "ExpanderController[{}]: animating to {} from {}",
            self.key,
            if expanded { "expanded" } else { "collapsed" },
            self.animation.value()
        );
        if self.animation.animate_to(target) == TickResult::Finished {
            self.settle();
        }
    }

    /// Advances the height animation. Returns true if progress moved.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        let before = self.animation.value();
        match self.animation.tick(frame_time_nanos) {
            TickResult::Idle => false,
            TickResult::Running => self.animation.value() != before,
            TickResult::Finished => {
                self.settle();
                true
            }
        }
    }

    fn settle(&mut self) {
        log::debug!(
            "ExpanderController[{}]: settled {}",
            self.key,
            if self.is_open { "expanded" } else { "collapsed" }
        );
        if let Some(callback) = &self.spec.on_state_changed {
            callback(self.is_open);
        }
    }

    /// Drops the persisted state when the section leaves the list for good.
    pub fn discard(self) {
        self.registry.remove(&self.key);
    }
}

impl std::fmt::Debug for ExpanderController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpanderController")
            .field("key", &self.key)
            .field("phase", &self.phase())
            .field("progress", &self.animation.value())
            .field("is_hovering", &self.is_hovering)
            .finish()
    }
}
