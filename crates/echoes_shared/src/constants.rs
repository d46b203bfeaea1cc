//! # Tuning Constants
//!
//! Defaults shared by the engine, the input collaborators and the browser
//! host. Profiles override most of these per effect.

// =============================================================================
// SURFACE
// =============================================================================

/// Device pixel ratio cap for the balanced tier.
///
/// Surfaces are allocated at `css size * min(dpr, DPR_CAP)`.
pub const DPR_CAP: f32 = 1.5;

// =============================================================================
// FRAME SCHEDULING
// =============================================================================

/// Minimum interval between executed frames (~24 fps).
pub const FRAME_INTERVAL_MS: f64 = 42.0;

// =============================================================================
// INPUT
// =============================================================================

/// A pointer counts as "moving" for this long after its last move event.
pub const MOVING_WINDOW_MS: f64 = 100.0;

/// Inactivity before the page is considered idle.
pub const IDLE_TIMEOUT_MS: f64 = 2_000.0;

/// Scroll velocity retained per 60 Hz frame.
pub const SCROLL_DECAY: f32 = 0.95;

/// Scroll delta to velocity gain.
pub const SCROLL_GAIN: f32 = 2.0;

/// Scroll velocity ceiling.
pub const SCROLL_VELOCITY_MAX: f32 = 100.0;

/// Clicks kept in the input history.
pub const CLICK_HISTORY: usize = 8;

/// Pointer moves kept in the input history.
///
/// Covers the moves between two ticks at the slowest tier with room to spare.
pub const MOVE_HISTORY: usize = 32;

// =============================================================================
// SIMULATION
// =============================================================================

/// Upper bound on the records one effect holds, whatever its count rule.
pub const MAX_RECORDS: usize = 10_000;

/// Ambient field density: one record per this many square CSS pixels.
pub const AMBIENT_DENSITY_PX2: f32 = 15_000.0;

/// Exponential smoothing factor for global opacity fades.
pub const FADE_SMOOTHING: f32 = 0.02;

/// Exponential smoothing factor for pursuit motion.
pub const PURSUIT_SMOOTHING: f32 = 0.02;

/// Velocity retained per tick by free particles.
pub const TRAIL_DAMPING: f32 = 0.98;

/// Global opacity below which a hidden effect counts as invisible.
pub const VISIBILITY_EPSILON: f32 = 0.01;
