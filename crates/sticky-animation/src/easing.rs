//! Easing curves.

/// Identifier of an easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowIn,
    /// Custom cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::FastOutSlowIn
    }
}

impl Easing {
    /// Control points of the curve, `None` for linear.
    fn control_points(self) -> Option<(f32, f32, f32, f32)> {
        match self {
            Easing::Linear => None,
            Easing::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Easing::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Easing::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Easing::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Easing::FastOutSlowIn => Some((0.4, 0.0, 0.2, 1.0)),
            Easing::CubicBezier { x1, y1, x2, y2 } => Some((x1, y1, x2, y2)),
        }
    }

    /// Eased value for linear progress `t`. Endpoints map exactly to 0 and 1.
    pub fn transform(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => solve_cubic(x1, y1, x2, y2, t),
        }
    }
}

const CUBIC_ERROR_BOUND: f32 = 0.001;

fn evaluate_cubic(a: f32, b: f32, m: f32) -> f32 {
    3.0 * a * (1.0 - m) * (1.0 - m) * m + 3.0 * b * (1.0 - m) * m * m + m * m * m
}

/// Bisects the x polynomial for `t`, then evaluates y at the found parameter.
fn solve_cubic(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let mut start = 0.0f32;
    let mut end = 1.0f32;
    // 32 halvings is far below f32 resolution; bounds the loop for odd inputs.
    for _ in 0..32 {
        let midpoint = (start + end) / 2.0;
        let estimate = evaluate_cubic(x1, x2, midpoint);
        if (t - estimate).abs() < CUBIC_ERROR_BOUND {
            return evaluate_cubic(y1, y2, midpoint);
        }
        if estimate < t {
            start = midpoint;
        } else {
            end = midpoint;
        }
    }
    evaluate_cubic(y1, y2, (start + end) / 2.0)
}

/// Evaluates curves on behalf of animations. Hosts may plug in their own.
pub trait CurveEvaluator {
    fn transform(&self, easing: Easing, t: f32) -> f32;
}

/// Built-in evaluator for [`Easing`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCurves;

impl CurveEvaluator for StandardCurves {
    fn transform(&self, easing: Easing, t: f32) -> f32 {
        easing.transform(t)
    }
}
