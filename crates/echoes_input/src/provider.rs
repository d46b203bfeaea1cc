//! Input providers.
//!
//! The engine only sees the [`InputProvider`] trait. The browser host feeds
//! an [`InputHub`] from DOM listeners; tests and the headless simulator use
//! [`StaticInput`] or drive a hub directly with synthetic events.

use std::cell::RefCell;
use std::rc::Rc;

use crate::idle::{ActivityKind, IdleDetector};
use crate::pointer::PointerTracker;
use crate::scroll::ScrollTracker;
use crate::snapshot::InputSnapshot;

/// Source of per-tick input snapshots.
pub trait InputProvider {
    /// Builds the snapshot for a tick at host time `now_ms`.
    fn snapshot(&self, now_ms: f64) -> InputSnapshot;

    /// Stops accepting events. Must be idempotent.
    fn detach(&mut self);

    /// True while the provider accepts events.
    fn is_attached(&self) -> bool;
}

/// Input hub shared between host listeners and one effect.
pub type SharedInput = Rc<RefCell<InputHub>>;

/// Aggregates pointer, idle and scroll state from host events.
#[derive(Debug, Clone)]
pub struct InputHub {
    /// Pointer position, speed and clicks.
    pointer: PointerTracker,
    /// Idle deadline.
    idle: IdleDetector,
    /// Scroll velocity.
    scroll: ScrollTracker,
    /// False after `detach`.
    attached: bool,
}

impl InputHub {
    /// Creates a hub with the given idle timeout, armed at `now_ms`.
    #[must_use]
    pub fn new(idle_timeout_ms: f64, now_ms: f64) -> Self {
        let mut idle = IdleDetector::new(idle_timeout_ms);
        idle.arm(now_ms);
        Self {
            pointer: PointerTracker::new(),
            idle,
            scroll: ScrollTracker::new(),
            attached: true,
        }
    }

    /// Wraps the hub for sharing with listener closures.
    #[must_use]
    pub fn shared(self) -> SharedInput {
        Rc::new(RefCell::new(self))
    }

    /// Pointer moved to `(x, y)`.
    pub fn pointer_moved(&mut self, x: f32, y: f32, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.pointer.on_move(x, y, now_ms);
        self.idle.activity(ActivityKind::PointerMove, now_ms);
    }

    /// Pointer clicked at `(x, y)`.
    pub fn clicked(&mut self, x: f32, y: f32, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.pointer.on_click(x, y);
        self.idle.activity(ActivityKind::PointerDown, now_ms);
    }

    /// Page scrolled to offset `y`.
    pub fn scrolled(&mut self, y: f32, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.scroll.on_scroll(y, now_ms);
        self.idle.activity(ActivityKind::Scroll, now_ms);
    }

    /// Any other activity (key press, touch start...).
    pub fn activity(&mut self, kind: ActivityKind, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.idle.activity(kind, now_ms);
    }

    /// The idle detector (hosts may schedule a timer at its deadline).
    #[must_use]
    pub fn idle_detector(&self) -> &IdleDetector {
        &self.idle
    }
}

impl InputProvider for InputHub {
    fn snapshot(&self, now_ms: f64) -> InputSnapshot {
        InputSnapshot {
            pointer: self.pointer.position(),
            pointer_moving: self.pointer.is_moving(now_ms),
            pointer_speed: self.pointer.speed(),
            move_serial: self.pointer.move_serial(),
            moves: self.pointer.moves(),
            clicks: self.pointer.clicks(),
            idle: self.idle.is_idle(now_ms),
            scroll_velocity: self.scroll.velocity_at(now_ms),
            scroll_y: self.scroll.position(),
        }
    }

    fn detach(&mut self) {
        if self.attached {
            tracing::debug!("input hub detached");
        }
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl<P: InputProvider> InputProvider for Rc<RefCell<P>> {
    fn snapshot(&self, now_ms: f64) -> InputSnapshot {
        self.borrow().snapshot(now_ms)
    }

    fn detach(&mut self) {
        self.borrow_mut().detach();
    }

    fn is_attached(&self) -> bool {
        self.borrow().is_attached()
    }
}

/// Fake provider returning a fixed snapshot (tests, headless runs).
#[derive(Debug, Clone, Default)]
pub struct StaticInput {
    /// The snapshot returned on every tick. Mutate freely between ticks.
    pub snapshot: InputSnapshot,
    /// False after `detach`.
    attached: bool,
}

impl StaticInput {
    /// Creates an attached provider returning `snapshot`.
    #[must_use]
    pub fn new(snapshot: InputSnapshot) -> Self {
        Self {
            snapshot,
            attached: true,
        }
    }
}

impl InputProvider for StaticInput {
    fn snapshot(&self, _now_ms: f64) -> InputSnapshot {
        self.snapshot.clone()
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
