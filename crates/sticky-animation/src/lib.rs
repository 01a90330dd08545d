//! Animation primitives for sticky section headers.
//!
//! - [`Easing`] / [`CurveEvaluator`] - map linear progress to eased progress
//! - [`AnimationSpec`] - duration plus curve
//! - [`ProgressAnimation`] - a 0..1 controller driven by frame timestamps
//! - [`FrameClock`] - converts wall time into frame nanos for real hosts

mod clock;
mod easing;
mod progress;

pub use clock::*;
pub use easing::*;
pub use progress::*;
