//! `requestAnimationFrame` as a [`FrameHost`].

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use echoes_effects::{FrameHost, FrameRequest};

/// Callback handed to `requestAnimationFrame` (receives the frame timestamp).
pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// Schedules one layer's frame callback on the window.
pub struct RafHost {
    window: Window,
    /// Installed by `EchoesLayer::start`, released on teardown.
    callback: Option<FrameCallback>,
}

impl RafHost {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.callback.is_some()
    }

    pub fn install(&mut self, callback: FrameCallback) {
        self.callback = Some(callback);
    }

    /// Drops the callback. Only call once the pending frame is cancelled.
    pub fn release(&mut self) {
        self.callback = None;
    }
}

impl FrameHost for RafHost {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        let callback = self.callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
            .map(FrameRequest)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let _ = self.window.cancel_animation_frame(request.0);
    }
}
