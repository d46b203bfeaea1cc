//! Easing curves and exponential smoothing.
//!
//! Two different tools live here:
//! - [`Easing`] maps normalized progress to an eased value (ripple growth).
//! - [`Smoothed`] chases a moving target with a fixed per-tick factor
//!   (idle fades, pursuit). It never snaps: each step covers a fraction of
//!   the remaining distance.

use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Cubic ease-out (fast start, gentle landing).
    EaseOut,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// A scalar eased toward a target by a fixed fraction per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed {
    /// Current value.
    value: f32,
    /// Fraction of the remaining distance covered per step.
    factor: f32,
}

impl Smoothed {
    /// Creates a smoothed value.
    #[must_use]
    pub fn new(value: f32, factor: f32) -> Self {
        Self {
            value,
            factor: factor.clamp(0.0, 1.0),
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advances one step toward `target`: `value += (target - value) * factor`.
    pub fn step(&mut self, target: f32) -> f32 {
        self.value += (target - self.value) * self.factor;
        self.value
    }

    /// Immediately sets the value.
    pub fn set_immediate(&mut self, value: f32) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut] {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_out_is_front_loaded() {
        assert!(Easing::EaseOut.apply(0.3) > 0.6);
    }

    #[test]
    fn test_smoothed_never_overshoots() {
        let mut s = Smoothed::new(0.0, 0.02);
        let mut last = 0.0;
        for _ in 0..500 {
            let v = s.step(1.0);
            assert!(v > last && v <= 1.0);
            last = v;
        }
    }
}
