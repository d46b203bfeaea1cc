//! # Effect Profiles
//!
//! Every canvas effect is the same engine driven by a different [`Profile`].
//! A profile picks a [`MotionLaw`] for the update stage and a
//! [`RenderPrimitive`] for the render stage, plus the ranges records are
//! drawn from and the pacing/quality knobs.
//!
//! ```text
//!   Profile ─┬─ ranges (palette, size, speed, opacity, pulse)
//!            ├─ MotionLaw       Orbit | Pursuit | Follow | Free | Expand | Still
//!            ├─ RenderPrimitive Glow  | Blob | WaveLines | Ring | Spotlight | ScrollBands
//!            ├─ links / trail / blend / layer
//!            └─ pacing (frame interval, DPR cap) ◄── PerformanceTier
//! ```

use serde::{Deserialize, Serialize};

use echoes_shared::{
    Easing, GradientStop, Hsla, Palette, Rgba, Span, FRAME_INTERVAL_MS, IDLE_TIMEOUT_MS, MAX_RECORDS,
};

use crate::canvas::BlendMode;
use crate::error::{EffectError, EffectResult};

// ============================================================================
// COUNTS
// ============================================================================

/// How many records a reseed produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CountRule {
    /// A constant number of records.
    Fixed {
        /// Record count.
        count: usize,
    },
    /// One record per `px_per_record` CSS pixels of surface area.
    Density {
        /// Area per record (px²).
        px_per_record: f32,
    },
}

impl CountRule {
    /// Resolves the count for a CSS surface of `width` x `height`, never
    /// above [`MAX_RECORDS`].
    #[must_use]
    pub fn resolve(&self, width: f32, height: f32) -> usize {
        let count = match *self {
            Self::Fixed { count } => count,
            Self::Density { px_per_record } => {
                if px_per_record <= 0.0 || width <= 0.0 || height <= 0.0 {
                    0
                } else {
                    // Float-to-int casts saturate.
                    (width * height / px_per_record).floor() as usize
                }
            }
        };
        count.min(MAX_RECORDS)
    }

    /// Scales the count (tiers).
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        match *self {
            Self::Fixed { count } if count > 0 => Self::Fixed {
                count: ((count as f32 * factor).round() as usize).max(1),
            },
            Self::Fixed { count } => Self::Fixed { count },
            Self::Density { px_per_record } => Self::Density {
                px_per_record: px_per_record / factor.max(f32::EPSILON),
            },
        }
    }
}

// ============================================================================
// MOTION LAWS
// ============================================================================

/// How an orbiting field is laid out on reseed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrbitLayout {
    /// Each record orbits its own random anchor on a fixed ellipse.
    Scatter {
        /// Horizontal orbit radius.
        radius_x: f32,
        /// Vertical orbit radius.
        radius_y: f32,
    },
    /// Records share the surface centre and lie on a spiral.
    Spiral {
        /// Number of turns of the spiral.
        turns: f32,
        /// Innermost radius.
        inner: f32,
        /// Outermost radius as a fraction of `min(width, height)`.
        outer_fraction: f32,
    },
}

/// Parameters of the orbit law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    /// Initial layout.
    pub layout: OrbitLayout,
    /// `angle += speed * speed_scale` per tick.
    pub speed_scale: f32,
    /// Vertical angle multiplier (0.5 gives a figure-eight).
    pub y_frequency: f32,
    /// Horizontal sine drift amplitude (px). 0 disables drift.
    pub drift_amplitude: f32,
    /// Drift frequency (radians per ms).
    pub drift_rate: f32,
    /// Pointer distance below which the orbit contracts. 0 disables it.
    pub pull_threshold: f32,
    /// Contraction at zero distance (`radius *= 1 - pull * k`).
    pub pull_strength: f32,
    /// How far the shared centre leans toward the pointer (0-1).
    pub center_follow: f32,
}

/// Parameters of the pursuit law (blobs).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuitParams {
    /// Lissajous amplitude as a fraction of the surface size.
    pub orbit_fraction: f32,
    /// `angle += angular_rate * speed` per tick.
    pub angular_rate: f32,
    /// Vertical angle multiplier.
    pub y_frequency: f32,
    /// Pointer influence range (px).
    pub influence_radius: f32,
    /// Fraction of the pointer offset added to the target at zero distance.
    pub attraction: f32,
    /// Easing factor toward the target per tick.
    pub smoothing: f32,
    /// Radius pulse amplitude (px).
    pub radius_pulse: f32,
    /// Radius pulse phase step per tick.
    pub pulse_rate: f32,
}

/// Parameters of the follow law (pointer glow).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowParams {
    /// Fraction of the distance to the pointer covered per tick.
    pub smoothing: f32,
}

/// Parameters of the free law (trails).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeParams {
    /// Velocity multiplier per tick.
    pub damping: f32,
    /// Lifetime range in ticks.
    pub lifetime_ticks: Span,
    /// Spawn jitter around the origin (px, full width).
    pub jitter: f32,
    /// Initial velocity range per axis (full width).
    pub launch_speed: f32,
}

/// Parameters of the expand law (ripples).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpandParams {
    /// Radius reached when life runs out (px).
    pub max_radius: f32,
    /// Lifetime in ticks.
    pub lifetime_ticks: f32,
    /// Growth curve.
    pub easing: Easing,
    /// Strength per unit of pointer speed.
    pub strength_gain: f32,
    /// Strength cap.
    pub strength_max: f32,
}

impl ExpandParams {
    /// Ripple strength for a pointer speed (`None` = full strength).
    #[must_use]
    pub fn strength_for(&self, speed: Option<f32>) -> f32 {
        speed.map_or(self.strength_max, |s| (s * self.strength_gain).min(self.strength_max))
    }
}

/// Update-stage law applied to every record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "law", rename_all = "snake_case")]
pub enum MotionLaw {
    /// Closed-form orbits (aurora, vortex).
    Orbit(OrbitParams),
    /// Eased pursuit of a Lissajous target (blobs).
    Pursuit(PursuitParams),
    /// Eased pursuit of the pointer itself (pointer glow).
    Follow(FollowParams),
    /// Damped free flight with finite life (trails).
    Free(FreeParams),
    /// Expanding rings with finite life (ripples).
    Expand(ExpandParams),
    /// Records never move; the layer is drawn from input alone (scroll bands).
    Still,
}

impl MotionLaw {
    /// True if records die and get pruned.
    #[must_use]
    pub fn is_finite_life(&self) -> bool {
        matches!(self, Self::Free(_) | Self::Expand(_))
    }
}

/// How the pulse blends base and amplified values.
///
/// `opacity = base * (opacity_floor + pulse * (1 - opacity_floor))` and
/// `size = base * (size_floor + pulse * size_gain)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modulation {
    /// Opacity factor at the bottom of the pulse.
    pub opacity_floor: f32,
    /// Size factor at the bottom of the pulse.
    pub size_floor: f32,
    /// Extra size factor at the top of the pulse.
    pub size_gain: f32,
}

impl Modulation {
    /// No modulation.
    pub const NONE: Self = Self {
        opacity_floor: 1.0,
        size_floor: 1.0,
        size_gain: 0.0,
    };
}

// ============================================================================
// RENDER PRIMITIVES
// ============================================================================

/// One gradient stop, relative to the record's hue and opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopStyle {
    /// Offset along the radius.
    pub offset: f32,
    /// Saturation (%).
    pub saturation: f32,
    /// Lightness (%).
    pub lightness: f32,
    /// Multiplier on the record opacity.
    pub alpha: f32,
}

impl StopStyle {
    /// Creates a stop.
    #[must_use]
    pub const fn new(offset: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            offset,
            saturation,
            lightness,
            alpha,
        }
    }
}

/// Bright dot drawn over a glow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreStyle {
    /// Radius as a multiple of the record size.
    pub radius_scale: f32,
    /// Saturation (%).
    pub saturation: f32,
    /// Lightness (%).
    pub lightness: f32,
}

/// Radial glow around each point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowStyle {
    /// Glow radius as a multiple of the record size.
    pub radius_scale: f32,
    /// Centre, middle and edge stops.
    pub stops: [StopStyle; 3],
    /// Optional core dot.
    pub core: Option<CoreStyle>,
}

/// Soft blob with additive bridges between overlapping neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobStyle {
    /// Centre, middle and edge stops (alpha is absolute).
    pub stops: [StopStyle; 3],
    /// Draw bridges between overlapping blobs.
    pub bridges: bool,
    /// Bridge alpha at zero distance.
    pub bridge_alpha: f32,
    /// Compositing mode for bridges.
    pub bridge_blend: BlendMode,
}

/// Horizontal wave lines displaced by time, pointer and ripples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveStyle {
    /// Number of lines.
    pub lines: usize,
    /// Horizontal sample step (px).
    pub step: f32,
    /// Wave time advanced per tick.
    pub time_rate: f32,
    /// Amplitudes of the two base waves (px).
    pub amplitude: [f32; 2],
    /// Spatial frequencies of the two base waves.
    pub frequency: [f32; 2],
    /// Time multiplier of the second wave.
    pub drift: f32,
    /// Pointer influence range (px).
    pub pointer_radius: f32,
    /// Pointer displacement at zero distance (px).
    pub pointer_amplitude: f32,
    /// Half-width of a ripple's displacement band (px).
    pub ripple_band: f32,
    /// Spatial frequency of ripple displacement.
    pub ripple_frequency: f32,
    /// Hue of the top line.
    pub hue_start: f32,
    /// Hue added across all lines.
    pub hue_span: f32,
    /// Saturation (%).
    pub saturation: f32,
    /// Lightness (%).
    pub lightness: f32,
    /// Alpha of the top line.
    pub alpha_base: f32,
    /// Alpha added across all lines.
    pub alpha_gain: f32,
    /// Alpha added per unit of scroll velocity.
    pub scroll_alpha: f32,
    /// Line width.
    pub width: f32,
}

/// Expanding ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingStyle {
    /// Centre, middle and edge stops.
    pub stops: [StopStyle; 3],
}

/// Filled wave band under a spotlight, with a vertical gradient fill.
///
/// The top edge sits at `baseline * height`, displaced by two sine waves
/// and by a bump that follows the spotlight horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveBandStyle {
    /// Resting edge height as a fraction of the surface height.
    pub baseline: f32,
    /// Horizontal sample step (px).
    pub step: f32,
    /// Wave time per ms of host time.
    pub time_rate: f32,
    /// Amplitudes of the two waves (px).
    pub amplitude: [f32; 2],
    /// Spatial frequencies of the two waves.
    pub frequency: [f32; 2],
    /// Time multiplier of the second wave.
    pub drift: f32,
    /// Bump height under the spotlight (px).
    pub pointer_amplitude: f32,
    /// Bump falloff: zero at `width / pointer_reach` from the spotlight.
    pub pointer_reach: f32,
    /// Time multiplier of the bump oscillation.
    pub pointer_rate: f32,
    /// Gradient start as a fraction of the surface height.
    pub gradient_top: f32,
    /// Colour at the gradient start; it fades to transparent at the bottom.
    pub color: Hsla,
}

/// Large radial glow centred on each record, with fixed colour stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotlightStyle {
    /// Glow radius (px).
    pub radius: f32,
    /// Gradient stops from centre to edge.
    pub stops: [GradientStop; 4],
    /// Optional wave band drawn under the glow.
    pub band: Option<WaveBandStyle>,
}

/// One horizontal colour band of a scroll-band layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollBand {
    /// Band colour at its centre line (alpha is ignored).
    pub color: Hsla,
    /// Resting top edge as a fraction of the surface height.
    pub anchor: f32,
    /// Band height (px).
    pub height: f32,
    /// Vertical shift at the end of the scroll range (px, may be negative).
    pub shift: f32,
    /// Opacity at rest.
    pub opacity: f32,
    /// Opacity added per unit of scroll velocity.
    pub opacity_gain: f32,
    /// Blur radius at rest (px).
    pub blur: f32,
    /// Blur removed per unit of scroll velocity.
    pub blur_gain: f32,
}

/// Soft horizontal bands that shift with the scroll position and sharpen
/// and brighten with scroll velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollBandStyle {
    /// Scroll offset (px) at which bands reach their full shift.
    pub scroll_range: f32,
    /// Bands, bottom to top.
    pub bands: [ScrollBand; 3],
}

/// Render-stage primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderPrimitive {
    /// Radial glow per point.
    Glow(GlowStyle),
    /// Soft blobs.
    Blob(BlobStyle),
    /// Displaced wave lines (records only displace, they are not drawn).
    WaveLines(WaveStyle),
    /// Expanding rings.
    Ring(RingStyle),
    /// Pointer spotlight, optionally over a wave band.
    Spotlight(SpotlightStyle),
    /// Scroll-driven colour bands (records are not drawn).
    ScrollBands(ScrollBandStyle),
}

/// Segments between nearby points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkStyle {
    /// Maximum link distance (px).
    pub threshold: f32,
    /// Each record links to at most this many following records.
    pub window: usize,
    /// Alpha at zero distance.
    pub alpha: f32,
    /// Line width.
    pub width: f32,
    /// Saturation (%).
    pub saturation: f32,
    /// Lightness (%).
    pub lightness: f32,
}

/// Persistence between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrailMode {
    /// Full clear every frame.
    Clear,
    /// Low-alpha overpaint, leaving trails.
    Fade {
        /// Overpaint colour.
        color: Rgba,
        /// Overpaint alpha.
        alpha: f32,
    },
}

// ============================================================================
// BEHAVIOUR
// ============================================================================

/// What the idle flag does to an effect's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleGate {
    /// Always visible.
    #[default]
    Ignore,
    /// Fades in while idle, out on activity.
    ShowWhenIdle,
    /// Fades out while idle.
    HideWhenIdle,
}

/// Idle handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdleBehavior {
    /// Visibility gate.
    pub gate: IdleGate,
    /// Stop updating while fully faded out.
    pub suspend_when_hidden: bool,
    /// Fade smoothing factor per tick.
    pub fade_rate: f32,
    /// Inactivity before the page counts as idle (ms).
    #[serde(default = "default_idle_timeout")]
    pub timeout_ms: f64,
}

fn default_idle_timeout() -> f64 {
    IDLE_TIMEOUT_MS
}

impl Default for IdleBehavior {
    fn default() -> Self {
        Self {
            gate: IdleGate::Ignore,
            suspend_when_hidden: false,
            fade_rate: echoes_shared::constants::FADE_SMOOTHING,
            timeout_ms: IDLE_TIMEOUT_MS,
        }
    }
}

/// What makes a spawn-on-demand effect emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnTrigger {
    /// Every tick while the pointer is moving.
    PointerMoving,
    /// Once per move event faster than `min_speed`.
    PointerSpeed {
        /// Minimum move distance (px).
        min_speed: f32,
    },
    /// Once per click.
    Click,
}

/// Spawn-on-demand rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// Trigger.
    pub trigger: SpawnTrigger,
    /// Records per emission.
    pub batch: usize,
    /// Store cap; overflow displaces the oldest.
    pub capacity: usize,
}

/// How the surface sits in the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// CSS `z-index`.
    pub z_index: i32,
    /// CSS `mix-blend-mode`.
    pub mix_blend: BlendMode,
    /// CSS opacity of the whole layer.
    pub opacity: f32,
    /// CSS blur over the whole layer (px, 0 = none).
    #[serde(default)]
    pub blur_px: f32,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            z_index: 1,
            mix_blend: BlendMode::Screen,
            opacity: 1.0,
            blur_px: 0.0,
        }
    }
}

// ============================================================================
// TIERS
// ============================================================================

/// Quality tier applied on top of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// Full density, 60 fps, DPR up to 2.
    Full,
    /// 60% density, 30 fps, DPR up to 1.5.
    #[default]
    Balanced,
    /// 35% density, 24 fps, DPR 1.
    Low,
}

impl PerformanceTier {
    /// Multiplier on record counts.
    #[must_use]
    pub const fn count_scale(self) -> f32 {
        match self {
            Self::Full => 1.0,
            Self::Balanced => 0.6,
            Self::Low => 0.35,
        }
    }

    /// Minimum interval between executed frames (ms).
    #[must_use]
    pub fn frame_interval_ms(self) -> f64 {
        match self {
            Self::Full => 1_000.0 / 60.0,
            Self::Balanced => 1_000.0 / 30.0,
            Self::Low => 1_000.0 / 24.0,
        }
    }

    /// Device-pixel-ratio cap.
    #[must_use]
    pub const fn dpr_cap(self) -> f32 {
        match self {
            Self::Full => 2.0,
            Self::Balanced => 1.5,
            Self::Low => 1.0,
        }
    }

    /// Parses a tier name.
    pub fn parse(name: &str) -> EffectResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "balanced" => Ok(Self::Balanced),
            "low" => Ok(Self::Low),
            other => Err(EffectError::InvalidConfig(format!("unknown tier `{other}`"))),
        }
    }
}

// ============================================================================
// PROFILE
// ============================================================================

/// Complete description of one effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Name used in logs and stats.
    pub name: String,
    /// Hues records draw from.
    pub palette: Palette,
    /// Records per reseed.
    pub count: CountRule,
    /// Base size range.
    pub size: Span,
    /// Speed range.
    pub speed: Span,
    /// Base opacity range.
    pub opacity: Span,
    /// Pulse frequency range (radians per ms).
    pub pulse_speed: Span,
    /// Pulse blend.
    pub modulation: Modulation,
    /// Update law.
    pub motion: MotionLaw,
    /// Draw primitive.
    pub primitive: RenderPrimitive,
    /// Proximity links.
    pub links: Option<LinkStyle>,
    /// Frame persistence.
    pub trail: TrailMode,
    /// Compositing for records.
    pub blend: BlendMode,
    /// Minimum interval between executed frames (ms).
    pub frame_interval_ms: f64,
    /// Device-pixel-ratio cap.
    pub dpr_cap: f32,
    /// Idle handling.
    pub idle: IdleBehavior,
    /// Spawn-on-demand rule.
    pub spawn: Option<SpawnRule>,
    /// Page layer placement.
    pub layer: LayerStyle,
    /// Orbit speed gain per unit of scroll velocity.
    pub scroll_response: f32,
}

impl Profile {
    /// Range every record's modulated opacity stays within.
    #[must_use]
    pub fn opacity_envelope(&self) -> Span {
        match self.motion {
            MotionLaw::Orbit(_) | MotionLaw::Pursuit(_) => Span::new(
                self.opacity.min * self.modulation.opacity_floor,
                self.opacity.max,
            ),
            MotionLaw::Free(_) | MotionLaw::Expand(_) => Span::new(0.0, self.opacity.max),
            MotionLaw::Follow(_) | MotionLaw::Still => self.opacity,
        }
    }

    /// Range every record's modulated size stays within.
    #[must_use]
    pub fn size_envelope(&self) -> Span {
        match self.motion {
            MotionLaw::Orbit(_) => Span::new(
                self.size.min * self.modulation.size_floor,
                self.size.max * (self.modulation.size_floor + self.modulation.size_gain),
            ),
            MotionLaw::Pursuit(p) => Span::new(
                (self.size.min - p.radius_pulse).max(0.0),
                self.size.max + p.radius_pulse,
            ),
            MotionLaw::Free(_) => Span::new(0.0, self.size.max),
            MotionLaw::Expand(p) => Span::new(0.0, p.max_radius),
            MotionLaw::Follow(_) | MotionLaw::Still => self.size,
        }
    }

    /// Applies a performance tier (counts, frame interval, DPR cap).
    #[must_use]
    pub fn with_tier(mut self, tier: PerformanceTier) -> Self {
        let scale = tier.count_scale();
        self.count = self.count.scaled(scale);
        if let RenderPrimitive::WaveLines(style) = &mut self.primitive {
            style.lines = ((style.lines as f32 * scale).round() as usize).max(1);
        }
        self.frame_interval_ms = tier.frame_interval_ms();
        self.dpr_cap = tier.dpr_cap();
        self
    }

    /// Checks every range and knob.
    pub fn validate(&self) -> EffectResult<()> {
        let fail = |reason: &str| Err(EffectError::invalid(&self.name, reason));

        if self.name.trim().is_empty() {
            return Err(EffectError::invalid("<unnamed>", "name is empty"));
        }
        if self.palette.is_empty() {
            return fail("palette is empty");
        }
        if self.palette.0.iter().any(|h| !h.is_finite()) {
            return fail("palette contains a non-finite hue");
        }
        for (label, span) in [
            ("size", self.size),
            ("speed", self.speed),
            ("opacity", self.opacity),
            ("pulse_speed", self.pulse_speed),
        ] {
            if !span.is_valid() {
                return fail(&format!("{label} range is inverted or not finite"));
            }
        }
        if self.size.min < 0.0 {
            return fail("size must not be negative");
        }
        if self.opacity.min < 0.0 || self.opacity.max > 1.0 {
            return fail("opacity must lie within [0, 1]");
        }
        match self.count {
            CountRule::Density { px_per_record } => {
                if !(px_per_record.is_finite() && px_per_record > 0.0) {
                    return fail("density must be positive");
                }
            }
            CountRule::Fixed { count } => {
                if count > MAX_RECORDS {
                    return fail(&format!("count must not exceed {MAX_RECORDS}"));
                }
            }
        }
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms > 0.0) {
            return fail("frame interval must be positive");
        }
        if !(self.dpr_cap.is_finite() && self.dpr_cap > 0.0) {
            return fail("dpr cap must be positive");
        }
        if !(self.idle.fade_rate > 0.0 && self.idle.fade_rate <= 1.0) {
            return fail("idle fade rate must lie within (0, 1]");
        }
        if !(self.idle.timeout_ms.is_finite() && self.idle.timeout_ms > 0.0) {
            return fail("idle timeout must be positive");
        }
        let m = self.modulation;
        if !(0.0..=1.0).contains(&m.opacity_floor) || m.size_floor < 0.0 || m.size_gain < 0.0 {
            return fail("modulation floors must lie within [0, 1] and gains be non-negative");
        }
        if !(0.0..=1.0).contains(&self.layer.opacity) {
            return fail("layer opacity must lie within [0, 1]");
        }
        if !(self.layer.blur_px.is_finite() && self.layer.blur_px >= 0.0) {
            return fail("layer blur must not be negative");
        }
        if let TrailMode::Fade { alpha, .. } = self.trail {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return fail("trail fade alpha must lie within (0, 1]");
            }
        }
        if let Some(links) = self.links {
            if links.threshold <= 0.0 || links.window == 0 {
                return fail("links need a positive threshold and window");
            }
        }
        if let Some(spawn) = self.spawn {
            if spawn.batch == 0 || spawn.capacity == 0 {
                return fail("spawn batch and capacity must be positive");
            }
            if spawn.batch > MAX_RECORDS || spawn.capacity > MAX_RECORDS {
                return fail(&format!("spawn batch and capacity must not exceed {MAX_RECORDS}"));
            }
        }
        match self.motion {
            MotionLaw::Free(p) => {
                if !p.lifetime_ticks.is_valid() || p.lifetime_ticks.min < 1.0 {
                    return fail("trail lifetime must be at least one tick");
                }
            }
            MotionLaw::Expand(p) => {
                if p.lifetime_ticks < 1.0 || p.max_radius <= 0.0 {
                    return fail("ripples need a positive radius and lifetime");
                }
            }
            MotionLaw::Pursuit(p) => {
                if !(p.smoothing > 0.0 && p.smoothing <= 1.0) {
                    return fail("pursuit smoothing must lie within (0, 1]");
                }
            }
            MotionLaw::Follow(p) => {
                if !(p.smoothing > 0.0 && p.smoothing <= 1.0) {
                    return fail("follow smoothing must lie within (0, 1]");
                }
            }
            MotionLaw::Orbit(_) | MotionLaw::Still => {}
        }
        match self.primitive {
            RenderPrimitive::WaveLines(w) => {
                if w.lines == 0 || w.step <= 0.0 {
                    return fail("wave lines need a positive line count and step");
                }
                if w.lines > MAX_RECORDS {
                    return fail(&format!("wave lines must not exceed {MAX_RECORDS}"));
                }
            }
            RenderPrimitive::Spotlight(style) => {
                if style.radius <= 0.0 {
                    return fail("spotlight radius must be positive");
                }
                if style.band.is_some_and(|band| band.step <= 0.0) {
                    return fail("wave band step must be positive");
                }
            }
            RenderPrimitive::ScrollBands(style) => {
                if style.scroll_range <= 0.0 {
                    return fail("scroll range must be positive");
                }
                if style.bands.iter().any(|b| b.height <= 0.0 || b.blur < 0.0) {
                    return fail("scroll bands need a positive height and non-negative blur");
                }
            }
            RenderPrimitive::Glow(_) | RenderPrimitive::Blob(_) | RenderPrimitive::Ring(_) => {}
        }
        Ok(())
    }
}

/// Baseline pacing shared by every preset before a tier is applied.
pub(crate) const BASELINE_FRAME_INTERVAL_MS: f64 = FRAME_INTERVAL_MS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    #[test]
    fn test_density_count() {
        let rule = CountRule::Density { px_per_record: 15_000.0 };
        assert_eq!(rule.resolve(1500.0, 1000.0), 100);
        assert_eq!(rule.resolve(0.0, 1000.0), 0);
        assert_eq!(CountRule::Fixed { count: 6 }.resolve(0.0, 0.0), 6);
    }

    #[test]
    fn test_count_never_exceeds_record_bound() {
        let dense = CountRule::Density { px_per_record: 0.0001 };
        assert_eq!(dense.resolve(1920.0, 1080.0), MAX_RECORDS);
        assert_eq!(CountRule::Fixed { count: usize::MAX }.resolve(800.0, 600.0), MAX_RECORDS);

        let mut profile = Preset::Vortex.profile();
        profile.count = CountRule::Fixed { count: MAX_RECORDS + 1 };
        assert!(profile.validate().is_err());

        let mut profile = Preset::LightTrail.profile();
        if let Some(spawn) = profile.spawn.as_mut() {
            spawn.capacity = usize::MAX;
        }
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_idle_timeout_and_blur_are_validated() {
        let mut profile = Preset::Aurora.profile();
        profile.idle.timeout_ms = 0.0;
        assert!(profile.validate().is_err());
        profile.idle.timeout_ms = f64::NAN;
        assert!(profile.validate().is_err());

        let mut profile = Preset::LiquidBlobs.profile();
        profile.layer.blur_px = -1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_tier_scaling() {
        let aurora = Preset::Aurora.profile().with_tier(PerformanceTier::Low);
        assert_eq!(aurora.dpr_cap, 1.0);
        assert!((aurora.frame_interval_ms - 41.666).abs() < 0.01);
        assert_eq!(
            aurora.count.resolve(1500.0, 1000.0),
            (1500.0_f32 * 1000.0 / (15_000.0 / 0.35)).floor() as usize
        );

        let blobs = Preset::LiquidBlobs.profile().with_tier(PerformanceTier::Balanced);
        assert_eq!(blobs.count, CountRule::Fixed { count: 4 });

        let trail = Preset::LightTrail.profile().with_tier(PerformanceTier::Low);
        assert_eq!(trail.count, CountRule::Fixed { count: 0 });
    }

    #[test]
    fn test_every_preset_validates() {
        for preset in Preset::ALL {
            assert!(preset.profile().validate().is_ok(), "{preset:?}");
        }
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let mut profile = Preset::Aurora.profile();
        profile.opacity = Span::new(0.5, 1.5);
        assert!(matches!(profile.validate(), Err(EffectError::InvalidProfile { .. })));

        let mut profile = Preset::Vortex.profile();
        profile.size = Span::new(3.0, 1.0);
        assert!(profile.validate().is_err());

        let mut profile = Preset::Aurora.profile();
        profile.palette = Palette(Vec::new());
        assert!(profile.validate().is_err());

        let mut profile = Preset::Aurora.profile();
        profile.frame_interval_ms = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!(PerformanceTier::parse("LOW").ok(), Some(PerformanceTier::Low));
        assert!(PerformanceTier::parse("ultra").is_err());
    }
}
