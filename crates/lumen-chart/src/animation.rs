//! Eased transitions of drawn geometry.
//!
//! Each chart point owns a [`Transition`] from the shape it had when the
//! last measure pass ran to its new target. A transition is complete once the
//! clock passes `start + duration`; the scene is visually stable when every
//! transition is complete.

use std::time::Duration;

use lumen_core::Shape;

/// Easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingFunction {
    /// Linear interpolation
    Linear,
    /// Quadratic ease in
    QuadIn,
    /// Quadratic ease out
    QuadOut,
    /// Quadratic ease in-out
    QuadInOut,
    /// Cubic ease in
    CubicIn,
    /// Cubic ease out
    #[default]
    CubicOut,
    /// Cubic ease in-out
    CubicInOut,
    /// Bounce at the end
    BounceOut,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadIn => t * t,
            EasingFunction::QuadOut => t * (2.0 - t),
            EasingFunction::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            EasingFunction::CubicIn => t * t * t,
            EasingFunction::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            EasingFunction::CubicInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
            EasingFunction::BounceOut => {
                if t < 1.0 / 2.75 {
                    7.5625 * t * t
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    7.5625 * t * t + 0.75
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    7.5625 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / 2.75;
                    7.5625 * t * t + 0.984375
                }
            }
        }
    }
}

/// Time-based interpolation between two shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: Shape,
    to: Shape,
    start: Duration,
    duration: Duration,
    easing: EasingFunction,
}

impl Transition {
    pub fn new(
        from: Shape,
        to: Shape,
        start: Duration,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// A transition that is already at its target.
    pub fn settled(shape: Shape) -> Self {
        Self::new(shape, shape, Duration::ZERO, Duration::ZERO, EasingFunction::Linear)
    }

    pub fn target(&self) -> &Shape {
        &self.to
    }

    /// Normalized progress at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }

    pub fn value_at(&self, now: Duration) -> Shape {
        if self.is_complete(now) {
            return self.to;
        }
        self.from.lerp(&self.to, self.easing.apply(self.progress(now)))
    }

    /// Continue towards a new target from wherever this transition is at
    /// `now`. An unchanged target keeps the running transition.
    pub fn retarget(
        &self,
        to: Shape,
        now: Duration,
        duration: Duration,
        easing: EasingFunction,
    ) -> Transition {
        if self.to == to {
            return self.clone();
        }
        Transition::new(self.value_at(now), to, now, duration, easing)
    }
}
