// src/easing.rs

use strum_macros::{Display, EnumIter};

/// A cubic Bézier timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f32 = 1e-5;

impl Default for CubicBezier {
    fn default() -> Self {
        Self::new(0.25, 0.25, 0.75, 0.75)
    }
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn component(t: f32, p1: f32, p2: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn component_slope(t: f32, p1: f32, p2: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Finds the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = Self::component(t, self.x1, self.x2) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = Self::component_slope(t, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        // Newton did not converge, fall back to bisection on [0, 1].
        let (mut low, mut high) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = Self::component(t, self.x1, self.x2);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) * 0.5;
        }
        t
    }

    pub fn transform(&self, fraction: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(fraction);
        Self::component(t, self.y1, self.y2)
    }
}

/// Easing applied to the reveal animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Display, EnumIter)]
pub enum Easing {
    #[strum(serialize = "Linear")]
    Linear,
    #[default]
    #[strum(serialize = "Fast out, slow in")]
    FastOutSlowIn,
    #[strum(serialize = "Linear out, slow in")]
    LinearOutSlowIn,
    #[strum(serialize = "Fast out, linear in")]
    FastOutLinearIn,
    #[strum(serialize = "Custom")]
    Custom(CubicBezier),
}

impl Easing {
    pub const FAST_OUT_SLOW_IN: CubicBezier = CubicBezier::new(0.4, 0.0, 0.2, 1.0);
    pub const LINEAR_OUT_SLOW_IN: CubicBezier = CubicBezier::new(0.0, 0.0, 0.2, 1.0);
    pub const FAST_OUT_LINEAR_IN: CubicBezier = CubicBezier::new(0.4, 0.0, 1.0, 1.0);

    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(&self, fraction: f32) -> f32 {
        let fraction = fraction.clamp(0.0, 1.0);
        let eased = match self {
            Easing::Linear => fraction,
            Easing::FastOutSlowIn => Self::FAST_OUT_SLOW_IN.transform(fraction),
            Easing::LinearOutSlowIn => Self::LINEAR_OUT_SLOW_IN.transform(fraction),
            Easing::FastOutLinearIn => Self::FAST_OUT_LINEAR_IN.transform(fraction),
            Easing::Custom(curve) => curve.transform(fraction),
        };
        eased.clamp(0.0, 1.0)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Easing::Custom(_))
    }
}
