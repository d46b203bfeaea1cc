//! Pointer tracking.
//!
//! Records the latest pointer position, the speed of the latest move and
//! bounded move and click histories. "Moving" is derived lazily from the time of the
//! last move instead of being cleared by a polling timer.

use std::collections::VecDeque;

use echoes_shared::constants::{CLICK_HISTORY, MOVE_HISTORY};
use echoes_shared::{Vec2, MOVING_WINDOW_MS};

use crate::snapshot::{Click, PointerMove};

/// Pointer state fed by host move/click events.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    /// Current position (`None` until the first move).
    position: Option<Vec2>,
    /// Distance covered by the last move.
    speed: f32,
    /// Host time of the last move (ms).
    last_move_ms: f64,
    /// Number of moves seen.
    move_serial: u64,
    /// Recent moves, oldest first.
    moves: VecDeque<PointerMove>,
    /// Recent clicks, oldest first.
    clicks: VecDeque<Click>,
    /// Number of clicks seen.
    click_serial: u64,
    /// Recency window for the moving flag (ms).
    moving_window_ms: f64,
}

impl PointerTracker {
    /// Creates a tracker with the default 100 ms moving window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(MOVING_WINDOW_MS)
    }

    /// Creates a tracker with a custom moving window.
    #[must_use]
    pub fn with_window(moving_window_ms: f64) -> Self {
        Self {
            position: None,
            speed: 0.0,
            last_move_ms: f64::NEG_INFINITY,
            move_serial: 0,
            moves: VecDeque::with_capacity(MOVE_HISTORY),
            clicks: VecDeque::with_capacity(CLICK_HISTORY),
            click_serial: 0,
            moving_window_ms,
        }
    }

    /// Records a pointer move.
    pub fn on_move(&mut self, x: f32, y: f32, now_ms: f64) {
        let next = Vec2::new(x, y);
        self.speed = self.position.map_or(0.0, |prev| prev.distance(next));
        self.position = Some(next);
        self.last_move_ms = now_ms;
        self.move_serial += 1;

        if self.moves.len() == MOVE_HISTORY {
            self.moves.pop_front();
        }
        self.moves.push_back(PointerMove {
            serial: self.move_serial,
            position: next,
            speed: self.speed,
        });
    }

    /// Records a click at `(x, y)`.
    pub fn on_click(&mut self, x: f32, y: f32) {
        self.click_serial += 1;
        if self.clicks.len() == CLICK_HISTORY {
            self.clicks.pop_front();
        }
        self.clicks.push_back(Click {
            serial: self.click_serial,
            position: Vec2::new(x, y),
        });
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Distance covered by the last move.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Number of moves seen.
    #[must_use]
    pub fn move_serial(&self) -> u64 {
        self.move_serial
    }

    /// True if the pointer moved within the recency window.
    #[must_use]
    pub fn is_moving(&self, now_ms: f64) -> bool {
        now_ms - self.last_move_ms <= self.moving_window_ms
    }

    /// Recent moves, oldest first.
    #[must_use]
    pub fn moves(&self) -> Vec<PointerMove> {
        self.moves.iter().copied().collect()
    }

    /// Recent clicks, oldest first.
    #[must_use]
    pub fn clicks(&self) -> Vec<Click> {
        self.clicks.iter().copied().collect()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_window() {
        let mut tracker = PointerTracker::new();
        assert!(!tracker.is_moving(0.0));

        tracker.on_move(10.0, 10.0, 1_000.0);
        assert!(tracker.is_moving(1_050.0));
        assert!(tracker.is_moving(1_100.0));
        assert!(!tracker.is_moving(1_101.0));
    }

    #[test]
    fn test_speed_is_distance_between_moves() {
        let mut tracker = PointerTracker::new();
        tracker.on_move(0.0, 0.0, 0.0);
        assert_eq!(tracker.speed(), 0.0);
        tracker.on_move(3.0, 4.0, 16.0);
        assert_eq!(tracker.speed(), 5.0);
        assert_eq!(tracker.move_serial(), 2);
    }

    #[test]
    fn test_move_history_keeps_each_speed() {
        let mut tracker = PointerTracker::new();
        tracker.on_move(0.0, 0.0, 0.0);
        tracker.on_move(30.0, 40.0, 8.0);
        tracker.on_move(33.0, 44.0, 16.0);

        let speeds: Vec<f32> = tracker.moves().iter().map(|m| m.speed).collect();
        assert_eq!(speeds, vec![0.0, 50.0, 5.0]);

        for i in 0..100 {
            tracker.on_move(i as f32, 0.0, 20.0 + f64::from(i));
        }
        let moves = tracker.moves();
        assert_eq!(moves.len(), MOVE_HISTORY);
        assert_eq!(moves.last().map(|m| m.serial), Some(103));
    }

    #[test]
    fn test_click_history_is_bounded() {
        let mut tracker = PointerTracker::new();
        for i in 0..20 {
            tracker.on_click(i as f32, 0.0);
        }
        let clicks = tracker.clicks();
        assert_eq!(clicks.len(), CLICK_HISTORY);
        assert_eq!(clicks.last().map(|c| c.serial), Some(20));
        assert_eq!(clicks.first().map(|c| c.serial), Some(13));
    }
}
