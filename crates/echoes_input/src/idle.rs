//! Idle detection.
//!
//! A restartable deadline: every activity pushes the deadline to
//! `now + timeout`, and idleness is simply `now >= deadline`. Nothing wakes
//! up to flip a flag; the next reader computes it.

use echoes_shared::IDLE_TIMEOUT_MS;

/// Host events that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// Pointer moved.
    PointerMove,
    /// Pointer button pressed.
    PointerDown,
    /// Keyboard key pressed.
    KeyPress,
    /// Touch started.
    TouchStart,
    /// Page scrolled.
    Scroll,
}

impl ActivityKind {
    /// DOM event names that map to activity.
    pub const DOM_EVENTS: [(&'static str, Self); 5] = [
        ("mousemove", Self::PointerMove),
        ("mousedown", Self::PointerDown),
        ("keypress", Self::KeyPress),
        ("touchstart", Self::TouchStart),
        ("scroll", Self::Scroll),
    ];
}

/// Restartable idle deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleDetector {
    /// Silence required before idle (ms).
    timeout_ms: f64,
    /// Host time at which the page becomes idle.
    deadline_ms: f64,
}

impl IdleDetector {
    /// Creates a detector armed at time 0.
    #[must_use]
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            timeout_ms: timeout_ms.max(0.0),
            deadline_ms: timeout_ms.max(0.0),
        }
    }

    /// Arms the deadline from `now` (call once when listeners attach).
    pub fn arm(&mut self, now_ms: f64) {
        self.deadline_ms = now_ms + self.timeout_ms;
    }

    /// Records activity, restarting the deadline.
    pub fn activity(&mut self, _kind: ActivityKind, now_ms: f64) {
        self.arm(now_ms);
    }

    /// True once the deadline has passed without activity.
    #[must_use]
    pub fn is_idle(&self, now_ms: f64) -> bool {
        now_ms >= self.deadline_ms
    }

    /// Host time at which idleness begins (for hosts that prefer a timer).
    #[must_use]
    pub fn deadline(&self) -> f64 {
        self.deadline_ms
    }

    /// Configured timeout.
    #[must_use]
    pub fn timeout(&self) -> f64 {
        self.timeout_ms
    }
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new(IDLE_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_after_timeout() {
        let mut idle = IdleDetector::new(2_000.0);
        idle.arm(0.0);
        assert!(!idle.is_idle(1_999.0));
        assert!(idle.is_idle(2_000.0));
    }

    #[test]
    fn test_activity_restarts_deadline() {
        let mut idle = IdleDetector::new(2_000.0);
        idle.arm(0.0);
        idle.activity(ActivityKind::Scroll, 1_500.0);
        assert!(!idle.is_idle(3_000.0));
        assert!(idle.is_idle(3_500.0));
        assert_eq!(idle.deadline(), 3_500.0);
    }
}
