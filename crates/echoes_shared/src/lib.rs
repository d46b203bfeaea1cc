//! # ECHOES Shared
//!
//! Common types used by the simulation engine, the input collaborators and
//! the browser host.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `web-sys`
//! - `wasm-bindgen`
//! - Anything that needs a browser to run
//!
//! If you need DOM types, put them in `echoes_web`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod constants;
pub mod math;
pub mod smoothing;

pub use color::{mix_hue, GradientStop, Hsla, Palette, Rgba};
pub use constants::{DPR_CAP, FRAME_INTERVAL_MS, IDLE_TIMEOUT_MS, MAX_RECORDS, MOVING_WINDOW_MS};
pub use math::{influence, pulse, Span, Vec2};
pub use smoothing::{Easing, Smoothed};
