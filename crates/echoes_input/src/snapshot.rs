//! The per-tick input snapshot.

use echoes_shared::Vec2;

/// A click (or tap) the host reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Monotonic click number, starting at 1.
    pub serial: u64,
    /// Click position (CSS pixels).
    pub position: Vec2,
}

/// A pointer move the host reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMove {
    /// Monotonic move number, starting at 1.
    pub serial: u64,
    /// Position after the move (CSS pixels).
    pub position: Vec2,
    /// Distance from the previous position.
    pub speed: f32,
}

/// Everything an effect may read about the outside world during one tick.
///
/// Produced by an [`InputProvider`](crate::InputProvider), consumed
/// read-only. Serial numbers let several effects share one provider without
/// "consuming" events: each effect remembers the last serial it acted on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Last pointer position, `None` until the pointer first moves.
    pub pointer: Option<Vec2>,
    /// Pointer moved within the recency window.
    pub pointer_moving: bool,
    /// Distance covered by the most recent move event.
    pub pointer_speed: f32,
    /// Monotonic number of the most recent move event (0 = none yet).
    pub move_serial: u64,
    /// Most recent moves, oldest first.
    pub moves: Vec<PointerMove>,
    /// Most recent clicks, oldest first.
    pub clicks: Vec<Click>,
    /// No activity for the configured timeout.
    pub idle: bool,
    /// Decayed scroll velocity (0-100).
    pub scroll_velocity: f32,
    /// Last reported scroll offset (CSS pixels).
    pub scroll_y: f32,
}

impl InputSnapshot {
    /// Snapshot with the pointer resting at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            pointer: Some(position),
            ..Self::default()
        }
    }

    /// Moves newer than `serial`.
    pub fn moves_after(&self, serial: u64) -> impl Iterator<Item = &PointerMove> {
        self.moves.iter().filter(move |m| m.serial > serial)
    }

    /// Clicks newer than `serial`.
    pub fn clicks_after(&self, serial: u64) -> impl Iterator<Item = &Click> {
        self.clicks.iter().filter(move |c| c.serial > serial)
    }

    /// Serial of the newest click, or 0.
    #[must_use]
    pub fn last_click_serial(&self) -> u64 {
        self.clicks.last().map_or(0, |c| c.serial)
    }
}
