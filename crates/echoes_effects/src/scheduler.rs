//! # Frame Scheduler
//!
//! One loop per effect. Every host frame callback immediately requests the
//! next one; the Update+Render body only runs when at least the minimum
//! interval has passed since the last executed frame.
//!
//! ```text
//!   callback(now) ──► request next ──► now - last >= interval ? Run : Skip
//!                                             │
//!                                        last = now
//! ```
//!
//! Cancelling drops the outstanding request through the host and is
//! idempotent.

/// Opaque handle of a pending frame request (a `requestAnimationFrame` id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

/// Something that can schedule frame callbacks.
pub trait FrameHost {
    /// Requests one callback. `None` if the host cannot schedule.
    fn request_frame(&mut self) -> Option<FrameRequest>;

    /// Cancels a pending request.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// What a frame callback should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run Update+Render.
    Run,
    /// Too soon after the last executed frame.
    Skip,
    /// The loop is not running.
    Stopped,
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Never started.
    Idle,
    /// Requesting frames.
    Running,
    /// Cancelled for good.
    Cancelled,
}

/// Throttled frame loop.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    /// Minimum interval between executed frames (ms).
    min_interval_ms: f64,
    /// Host time of the last executed frame.
    last_run_ms: Option<f64>,
    /// Outstanding request.
    pending: Option<FrameRequest>,
    /// Loop state.
    state: LoopState,
    /// Callbacks received while running.
    callbacks: u64,
    /// Callbacks that ran the body.
    executed: u64,
}

impl FrameScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms: min_interval_ms.max(0.0),
            last_run_ms: None,
            pending: None,
            state: LoopState::Idle,
            callbacks: 0,
            executed: 0,
        }
    }

    /// Requests the first frame. No-op unless idle.
    pub fn start(&mut self, host: &mut impl FrameHost) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running;
        self.pending = host.request_frame();
    }

    /// Handles a frame callback at host time `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64, host: &mut impl FrameHost) -> FrameDecision {
        if self.state != LoopState::Running {
            return FrameDecision::Stopped;
        }
        self.callbacks += 1;
        self.pending = host.request_frame();

        if self.is_due(now_ms) {
            self.last_run_ms = Some(now_ms);
            self.executed += 1;
            FrameDecision::Run
        } else {
            FrameDecision::Skip
        }
    }

    /// True if a frame at `now_ms` may run the body.
    #[must_use]
    pub fn is_due(&self, now_ms: f64) -> bool {
        match self.last_run_ms {
            None => true,
            // A clock that went backwards restarts the interval.
            Some(last) if now_ms < last => true,
            Some(last) => now_ms - last >= self.min_interval_ms,
        }
    }

    /// Cancels the outstanding request. Idempotent.
    pub fn cancel(&mut self, host: &mut impl FrameHost) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
        self.state = LoopState::Cancelled;
    }

    /// Loop state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Outstanding request.
    #[must_use]
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Minimum interval (ms).
    #[must_use]
    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval_ms
    }

    /// Callbacks received.
    #[must_use]
    pub fn callbacks(&self) -> u64 {
        self.callbacks
    }

    /// Callbacks that ran the body.
    #[must_use]
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Callbacks skipped by the cap.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.callbacks - self.executed
    }
}

/// Frame host that only counts requests (tests, headless runs).
#[derive(Debug, Clone, Default)]
pub struct ManualFrameHost {
    /// Next id to hand out.
    next_id: i32,
    /// Requests not yet cancelled or superseded.
    outstanding: Option<FrameRequest>,
    /// Total requests.
    pub requested: u64,
    /// Total cancellations.
    pub cancelled: u64,
}

impl ManualFrameHost {
    /// Creates a host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The request that would fire next.
    #[must_use]
    pub fn outstanding(&self) -> Option<FrameRequest> {
        self.outstanding
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        self.next_id += 1;
        self.requested += 1;
        let request = FrameRequest(self.next_id);
        self.outstanding = Some(request);
        Some(request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.outstanding == Some(request) {
            self.outstanding = None;
        }
        self.cancelled += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_runs_once_per_interval() {
        use FrameDecision::{Run, Skip};

        let mut host = ManualFrameHost::new();
        let mut scheduler = FrameScheduler::new(42.0);
        scheduler.start(&mut host);

        let decisions: Vec<FrameDecision> = (0..10)
            .map(|i| scheduler.on_frame(f64::from(i) * 10.0, &mut host))
            .collect();

        assert_eq!(
            decisions,
            vec![Run, Skip, Skip, Skip, Skip, Run, Skip, Skip, Skip, Skip]
        );
        assert_eq!(host.requested, 11);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = FrameScheduler::new(42.0);
        scheduler.start(&mut host);
        scheduler.cancel(&mut host);
        scheduler.cancel(&mut host);

        assert_eq!(host.cancelled, 1);
        assert!(host.outstanding().is_none());
        assert_eq!(scheduler.on_frame(100.0, &mut host), FrameDecision::Stopped);
        assert_eq!(host.requested, 1);
    }

    #[test]
    fn test_cancelled_loop_does_not_restart() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = FrameScheduler::new(42.0);
        scheduler.cancel(&mut host);
        scheduler.start(&mut host);
        assert_eq!(scheduler.state(), LoopState::Cancelled);
        assert_eq!(host.requested, 0);
    }
}
