//! Frame-driven 0..1 progress controller.

use crate::{CurveEvaluator, Easing};
use std::time::Duration;

/// Duration and curve of a progress animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
            easing: Easing::FastOutSlowIn,
        }
    }
}

impl AnimationSpec {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Outcome of advancing an animation by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickResult {
    /// Nothing was running.
    Idle,
    /// Still moving toward the target.
    Running,
    /// Reached the target on this frame.
    Finished,
}

#[derive(Clone, Copy, Debug)]
struct ActiveRun {
    from: f32,
    /// Set on the first frame after the run starts.
    start_nanos: Option<u64>,
    duration_nanos: u64,
}

/// Linear controller in `[0, 1]` with an easing curve applied on read.
///
/// The controller value moves at a constant rate of one full sweep per
/// `spec.duration`. Retargeting keeps the current value and only rescales the
/// remaining duration, so reversing mid-flight never snaps.
#[derive(Clone, Debug)]
pub struct ProgressAnimation {
    value: f32,
    target: f32,
    spec: AnimationSpec,
    run: Option<ActiveRun>,
}

impl ProgressAnimation {
    pub fn new(initial: f32, spec: AnimationSpec) -> Self {
        let initial = initial.clamp(0.0, 1.0);
        Self {
            value: initial,
            target: initial,
            spec,
            run: None,
        }
    }

    /// Linear controller value.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    pub fn set_spec(&mut self, spec: AnimationSpec) {
        self.spec = spec;
    }

    /// Controller value with the configured curve applied by the built-in evaluator.
    pub fn eased_value(&self) -> f32 {
        self.spec.easing.transform(self.value)
    }

    /// Controller value with the curve evaluated by a host-supplied evaluator.
    pub fn eased_value_with(&self, curves: &dyn CurveEvaluator) -> f32 {
        curves.transform(self.spec.easing, self.value)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Starts moving toward `target` from the current value.
    ///
    /// Returns [`TickResult::Finished`] when the target was reached
    /// immediately (zero duration or already there), otherwise `Running`.
    pub fn animate_to(&mut self, target: f32) -> TickResult {
        let target = target.clamp(0.0, 1.0);
        self.target = target;
        let distance = (target - self.value).abs();
        let duration_nanos = (self.spec.duration.as_nanos() as f64 * distance as f64) as u64;
        if distance == 0.0 || duration_nanos == 0 {
            self.value = target;
            self.run = None;
            return TickResult::Finished;
        }
        self.run = Some(ActiveRun {
            from: self.value,
            start_nanos: None,
            duration_nanos,
        });
        TickResult::Running
    }

    /// Advances the animation to `frame_time_nanos`.
    pub fn tick(&mut self, frame_time_nanos: u64) -> TickResult {
        let Some(run) = self.run.as_mut() else {
            return TickResult::Idle;
        };
        let start = *run.start_nanos.get_or_insert(frame_time_nanos);
        let elapsed = frame_time_nanos.saturating_sub(start);
        let fraction = (elapsed as f64 / run.duration_nanos as f64).min(1.0) as f32;
        let from = run.from;
        if fraction >= 1.0 {
            self.value = self.target;
            self.run = None;
            return TickResult::Finished;
        }
        self.value = from + (self.target - from) * fraction;
        TickResult::Running
    }
}
