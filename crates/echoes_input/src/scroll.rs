//! Scroll velocity.
//!
//! Velocity is derived from successive scroll positions and decays
//! exponentially with elapsed time, so reading it is side-effect free.

use echoes_shared::constants::{SCROLL_DECAY, SCROLL_GAIN, SCROLL_VELOCITY_MAX};

/// Duration of one decay step (a 60 Hz frame).
const DECAY_STEP_MS: f64 = 1_000.0 / 60.0;

/// Scroll position history reduced to a decaying velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTracker {
    /// Last scroll offset.
    last_y: Option<f32>,
    /// Velocity at `sampled_ms`.
    velocity: f32,
    /// Host time of the last scroll event.
    sampled_ms: f64,
}

impl ScrollTracker {
    /// Creates a tracker at rest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_y: None,
            velocity: 0.0,
            sampled_ms: 0.0,
        }
    }

    /// Records a scroll position.
    pub fn on_scroll(&mut self, y: f32, now_ms: f64) {
        let decayed = self.velocity_at(now_ms);
        let delta = self.last_y.map_or(0.0, |last| (y - last).abs());
        let instant = (delta * SCROLL_GAIN).min(SCROLL_VELOCITY_MAX);

        self.velocity = instant.max(decayed);
        self.last_y = Some(y);
        self.sampled_ms = now_ms;
    }

    /// Last reported scroll offset (0 before any scroll).
    #[must_use]
    pub fn position(&self) -> f32 {
        self.last_y.unwrap_or(0.0)
    }

    /// Velocity at `now`, decayed since the last event.
    #[must_use]
    pub fn velocity_at(&self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.sampled_ms).max(0.0);
        let steps = (elapsed / DECAY_STEP_MS) as f32;
        self.velocity * SCROLL_DECAY.powf(steps)
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_is_capped() {
        let mut scroll = ScrollTracker::new();
        scroll.on_scroll(0.0, 0.0);
        scroll.on_scroll(500.0, 16.0);
        assert_eq!(scroll.velocity_at(16.0), SCROLL_VELOCITY_MAX);
    }

    #[test]
    fn test_position_tracks_last_offset() {
        let mut scroll = ScrollTracker::new();
        assert_eq!(scroll.position(), 0.0);
        scroll.on_scroll(240.0, 0.0);
        scroll.on_scroll(180.0, 16.0);
        assert_eq!(scroll.position(), 180.0);
    }

    #[test]
    fn test_velocity_decays() {
        let mut scroll = ScrollTracker::new();
        scroll.on_scroll(0.0, 0.0);
        scroll.on_scroll(20.0, 10.0);
        let fresh = scroll.velocity_at(10.0);
        assert_eq!(fresh, 40.0);

        let later = scroll.velocity_at(10.0 + DECAY_STEP_MS * 10.0);
        assert!(later < fresh);
        assert!((later - 40.0 * 0.95_f32.powi(10)).abs() < 1e-3);
    }
}
