//! The exported `EchoesLayer`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{Event, MouseEvent, Window};

use echoes_effects::{
    Effect, EffectError, PerformanceTier, Preset, Profile, ProfileConfig, ProfileOverride,
    Viewport,
};
use echoes_input::{ActivityKind, InputHub, SharedInput};

use crate::canvas2d::Canvas2d;
use crate::host::{FrameCallback, RafHost};
use crate::listeners::Listeners;
use crate::session::LayerSession;
use crate::style::seed_from_unit;

type LayerState = LayerSession<Canvas2d, SharedInput, RafHost>;

fn to_js(err: EffectError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}

fn viewport(window: &Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(
        dimension(window.inner_width()),
        dimension(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

/// One decorative canvas layer mounted over the page.
#[wasm_bindgen]
pub struct EchoesLayer {
    window: Window,
    state: Rc<RefCell<LayerState>>,
    listeners: Listeners,
}

#[wasm_bindgen]
impl EchoesLayer {
    /// Mounts a preset (`"aurora"`, `"vortex"`...) at an optional tier
    /// (`"full"`, `"balanced"`, `"low"`).
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str, tier: Option<String>) -> Result<EchoesLayer, JsValue> {
        let preset: Preset = preset.parse().map_err(to_js)?;
        let tier = tier
            .as_deref()
            .map(PerformanceTier::parse)
            .transpose()
            .map_err(to_js)?
            .unwrap_or_default();
        let profile = ProfileOverride::preset(preset).resolve(tier).map_err(to_js)?;
        Self::mount(profile)
    }

    /// Mounts the layer called `name` from a profile TOML document.
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(text: &str, name: &str) -> Result<EchoesLayer, JsValue> {
        let profiles = ProfileConfig::from_toml_str(text)
            .and_then(|config| config.resolve())
            .map_err(to_js)?;
        let profile = profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| JsValue::from_str(&format!("no layer named `{name}`")))?;
        Self::mount(profile)
    }

    /// Starts the frame loop. No-op for inert, running or torn-down layers.
    pub fn start(&mut self) {
        let weak = Rc::downgrade(&self.state);
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        let LayerState { effect, host } = &mut *state;
        if effect.is_inert() || effect.is_torn_down() || host.is_installed() {
            return;
        }
        host.install(frame_callback(weak));
        effect.start(host);
    }

    /// Re-reads the viewport (also done on every window `resize`).
    pub fn resize(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.effect.resize(viewport(&self.window));
        }
    }

    /// Cancels the loop, removes listeners and the canvas. Idempotent.
    pub fn teardown(&mut self) {
        self.listeners.remove_all();
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        state.close();
        state.host.release();
    }

    /// True if the layer has no drawing context.
    #[wasm_bindgen(getter, js_name = isInert)]
    pub fn is_inert(&self) -> bool {
        self.state.borrow().effect.is_inert()
    }

    /// Running statistics, for the console.
    pub fn stats(&self) -> String {
        let state = self.state.borrow();
        format!("{}: {:?}", state.effect.profile().name, state.effect.stats())
    }
}

impl EchoesLayer {
    fn mount(profile: Profile) -> Result<EchoesLayer, JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas = match Canvas2d::attach(&document, &profile.layer) {
            Ok(canvas) => Some(canvas),
            Err(err) => {
                tracing::warn!(layer = %profile.name, error = %err, "layer is inert");
                None
            }
        };

        let hub = InputHub::new(profile.idle.timeout_ms, now_ms(&window)).shared();
        let seed = seed_from_unit(js_sys::Math::random());
        let mut effect = Effect::new(profile, canvas, Rc::clone(&hub), seed);
        effect.resize(viewport(&window));
        let inert = effect.is_inert();

        let state = Rc::new(RefCell::new(LayerSession::new(
            effect,
            RafHost::new(window.clone()),
        )));

        let mut listeners = Listeners::new(&window);
        if !inert {
            wire_input(&mut listeners, &window, &hub)?;
            wire_resize(&mut listeners, &window, Rc::downgrade(&state))?;
        }

        Ok(EchoesLayer {
            window,
            state,
            listeners,
        })
    }
}

impl Drop for EchoesLayer {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Runs one frame callback; holds the layer weakly so the loop never keeps
/// it alive.
fn frame_callback(state: Weak<RefCell<LayerState>>) -> FrameCallback {
    Closure::wrap(Box::new(move |now: f64| {
        let Some(state) = state.upgrade() else {
            return;
        };
        let Ok(mut guard) = state.try_borrow_mut() else {
            return;
        };
        let LayerState { effect, host } = &mut *guard;
        effect.on_frame(now, host);
    }) as Box<dyn FnMut(f64)>)
}

fn wire_input(listeners: &mut Listeners, window: &Window, hub: &SharedInput) -> Result<(), JsValue> {
    for (event, kind) in ActivityKind::DOM_EVENTS {
        let hub = Rc::clone(hub);
        let window = window.clone();
        listeners.add(event, move |e: Event| {
            let now = now_ms(&window);
            let Ok(mut hub) = hub.try_borrow_mut() else {
                return;
            };
            match (kind, e.dyn_ref::<MouseEvent>()) {
                (ActivityKind::PointerMove, Some(m)) => {
                    hub.pointer_moved(m.client_x() as f32, m.client_y() as f32, now);
                }
                (ActivityKind::Scroll, _) => {
                    hub.scrolled(window.scroll_y().unwrap_or(0.0) as f32, now);
                }
                _ => hub.activity(kind, now),
            }
        })?;
    }

    let hub = Rc::clone(hub);
    let window = window.clone();
    listeners.add("click", move |e: Event| {
        let Some(m) = e.dyn_ref::<MouseEvent>() else {
            return;
        };
        if let Ok(mut hub) = hub.try_borrow_mut() {
            hub.clicked(m.client_x() as f32, m.client_y() as f32, now_ms(&window));
        }
    })
}

fn wire_resize(
    listeners: &mut Listeners,
    window: &Window,
    state: Weak<RefCell<LayerState>>,
) -> Result<(), JsValue> {
    let window = window.clone();
    listeners.add("resize", move |_: Event| {
        let Some(state) = state.upgrade() else {
            return;
        };
        if let Ok(mut guard) = state.try_borrow_mut() {
            guard.effect.resize(viewport(&window));
        };
    })
}
