//! Window event listeners that can all be removed again.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, Window};

/// Listeners added to one target, kept alive until removed.
pub struct Listeners {
    target: EventTarget,
    entries: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    pub fn new(window: &Window) -> Self {
        Self {
            target: window.clone().into(),
            entries: Vec::new(),
        }
    }

    /// Adds `handler` for `event`.
    pub fn add(
        &mut self,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        self.target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.entries.push((event, closure));
        Ok(())
    }

    /// Removes every listener. Idempotent.
    pub fn remove_all(&mut self) {
        for (event, closure) in self.entries.drain(..) {
            let _ = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove_all();
    }
}
