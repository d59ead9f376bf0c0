// src/ticker.rs

use std::time::{Duration, Instant};

use crate::easing::Easing;

/// Duration and easing of one reveal animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: crate::constants::DEFAULT_ANIM_DURATION,
            easing: Easing::default(),
        }
    }
}

/// Produces progress samples for a running animation from wall-clock instants.
///
/// The ticker holds no timer of its own; the caller passes `now` on every frame,
/// which keeps it independent of the render loop driving it.
#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    spec: AnimationSpec,
    started_at: Instant,
}

impl Ticker {
    pub fn start(spec: AnimationSpec, now: Instant) -> Self {
        Self {
            spec,
            started_at: now,
        }
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    /// Linear progress in `[0, 1]`.
    pub fn linear(&self, now: Instant) -> f32 {
        if self.spec.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.spec.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased progress in `[0, 1]`.
    pub fn sample(&self, now: Instant) -> f32 {
        self.spec.easing.apply(self.linear(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.spec.duration
    }
}
