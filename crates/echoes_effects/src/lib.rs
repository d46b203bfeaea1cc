//! # ECHOES Effects
//!
//! One per-frame particle/field simulation engine behind every decorative
//! canvas layer (aurora, liquid blobs, vortex, fluid lines, scroll bands,
//! pointer glow, light trail, click ripples). Effects differ only by
//! [`Profile`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Effect<C, I>                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  FrameScheduler ─► tick(now)                                 │
//! │                      │                                       │
//! │  InputProvider ──► snapshot ─► spawn ─► advance ─► prune     │
//! │                                   ParticleStore              │
//! │                                        │                     │
//! │  SurfaceManager<C: Canvas> ◄──── paint ┘                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - The per-frame path never fails; a missing canvas makes an effect inert
//! - One engine with tiers, no per-effect forks
//! - Nothing in this crate touches the DOM (see `echoes_web`)

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod canvas;
pub mod config;
pub mod effect;
pub mod error;
pub mod motion;
pub mod presets;
pub mod profile;
pub mod record;
pub mod render;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod surface;

pub use canvas::{BlendMode, Canvas, DrawCommand, RecordingCanvas};
pub use config::{ProfileConfig, ProfileOverride};
pub use effect::Effect;
pub use error::{EffectError, EffectResult};
pub use motion::{advance, wave_offset, Ripple, TickContext, VisibilityFade};
pub use presets::Preset;
pub use profile::{
    CountRule, IdleBehavior, IdleGate, LayerStyle, MotionLaw, PerformanceTier, Profile,
    RenderPrimitive, ScrollBandStyle, SpawnRule, SpawnTrigger, SpotlightStyle, TrailMode,
    WaveBandStyle,
};
pub use record::{FieldBlob, PointParticle, Record};
pub use render::paint;
pub use scheduler::{FrameDecision, FrameHost, FrameRequest, FrameScheduler, LoopState, ManualFrameHost};
pub use stats::{DrawStats, EffectStats, TickReport};
pub use store::ParticleStore;
pub use surface::{SurfaceManager, SurfaceSize, Viewport};
