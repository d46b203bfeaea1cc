//! An effect paired with the host that schedules it.
//!
//! Kept free of browser types so the drop path can be tested natively.

use echoes_effects::{Canvas, Effect, FrameHost};
use echoes_input::InputProvider;

/// One running layer. Dropping it tears the effect down.
pub struct LayerSession<C: Canvas, I: InputProvider, H: FrameHost> {
    /// The effect being driven.
    pub effect: Effect<C, I>,
    /// Frame scheduling for `effect`.
    pub host: H,
}

impl<C: Canvas, I: InputProvider, H: FrameHost> LayerSession<C, I, H> {
    /// Pairs `effect` with `host`.
    pub fn new(effect: Effect<C, I>, host: H) -> Self {
        Self { effect, host }
    }

    /// Cancels the pending frame and releases the canvas. Idempotent.
    pub fn close(&mut self) {
        if self.effect.is_torn_down() {
            return;
        }
        self.effect.teardown(&mut self.host);
        tracing::debug!(effect = %self.effect.profile().name, "layer session closed");
    }
}

impl<C: Canvas, I: InputProvider, H: FrameHost> Drop for LayerSession<C, I, H> {
    fn drop(&mut self) {
        self.close();
    }
}
