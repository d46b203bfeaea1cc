//! # ECHOES Web Host
//!
//! Runs effect layers in the browser. Each [`EchoesLayer`] owns one canvas
//! fixed over the viewport, one input hub fed by window listeners, and one
//! `requestAnimationFrame` loop.
//!
//! ```text
//!   window events ──► listeners ──► InputHub ◄── Effect ──► Canvas2d
//!                                                  ▲
//!   requestAnimationFrame ──► RafHost ─────────────┘
//! ```
//!
//! ```js
//! import init, { EchoesLayer } from "./echoes_web.js";
//! await init();
//! const aurora = new EchoesLayer("aurora", "balanced");
//! aurora.start();
//! // later
//! aurora.teardown();
//! ```
//!
//! Everything except [`style`] and [`session`] is wasm32-only.

#![deny(missing_docs)]
// wasm-bindgen exports expand to unsafe FFI glue.
#![cfg_attr(target_arch = "wasm32", allow(unsafe_code))]
#![cfg_attr(not(target_arch = "wasm32"), deny(unsafe_code))]

pub mod session;
pub mod style;

#[cfg(target_arch = "wasm32")]
mod canvas2d;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod layer;
#[cfg(target_arch = "wasm32")]
mod listeners;

#[cfg(target_arch = "wasm32")]
pub use layer::EchoesLayer;
