//! Built-in effect presets.
//!
//! Each preset is a full-density [`Profile`] at baseline pacing (42 ms
//! frames, 33 ms for the pointer glow, DPR cap 1.5). Apply a
//! [`PerformanceTier`](crate::PerformanceTier) to scale it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use echoes_shared::constants::{AMBIENT_DENSITY_PX2, PURSUIT_SMOOTHING, TRAIL_DAMPING};
use echoes_shared::{Easing, GradientStop, Hsla, Palette, Rgba, Span, DPR_CAP};

use crate::canvas::BlendMode;
use crate::error::EffectError;
use crate::profile::{
    BlobStyle, CoreStyle, CountRule, ExpandParams, FollowParams, FreeParams, GlowStyle,
    IdleBehavior, IdleGate, LayerStyle, LinkStyle, Modulation, MotionLaw, OrbitLayout,
    OrbitParams, Profile, PursuitParams, RenderPrimitive, RingStyle, ScrollBand, ScrollBandStyle,
    SpawnRule, SpawnTrigger, SpotlightStyle, StopStyle, TrailMode, WaveBandStyle, WaveStyle,
    BASELINE_FRAME_INTERVAL_MS,
};

/// Named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Drifting glow points that fade in while the page is idle.
    Aurora,
    /// Six soft blobs drifting around the centre, drawn toward the pointer.
    LiquidBlobs,
    /// Spiral of linked points orbiting a pointer-biased centre.
    Vortex,
    /// Wave lines displaced by time, pointer and ripples from fast moves.
    FluidLines,
    /// Three soft colour bands that drift with scrolling.
    ScrollBands,
    /// A wide glow easing after the pointer over a slow wave band.
    PointerGlow,
    /// Short-lived sparks emitted behind a moving pointer.
    LightTrail,
    /// A fading ring per click.
    ClickRipples,
}

impl Preset {
    /// Every preset, in layer order.
    pub const ALL: [Self; 8] = [
        Self::Aurora,
        Self::LiquidBlobs,
        Self::Vortex,
        Self::FluidLines,
        Self::ScrollBands,
        Self::PointerGlow,
        Self::LightTrail,
        Self::ClickRipples,
    ];

    /// Config-file name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Aurora => "aurora",
            Self::LiquidBlobs => "liquid_blobs",
            Self::Vortex => "vortex",
            Self::FluidLines => "fluid_lines",
            Self::ScrollBands => "scroll_bands",
            Self::PointerGlow => "pointer_glow",
            Self::LightTrail => "light_trail",
            Self::ClickRipples => "click_ripples",
        }
    }

    /// Builds the preset's profile.
    #[must_use]
    pub fn profile(&self) -> Profile {
        match self {
            Self::Aurora => aurora(),
            Self::LiquidBlobs => liquid_blobs(),
            Self::Vortex => vortex(),
            Self::FluidLines => fluid_lines(),
            Self::ScrollBands => scroll_bands(),
            Self::PointerGlow => pointer_glow(),
            Self::LightTrail => light_trail(),
            Self::ClickRipples => click_ripples(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| EffectError::UnknownPreset(s.to_owned()))
    }
}

/// Fields shared by all presets.
fn base(name: &str, palette: Palette, motion: MotionLaw, primitive: RenderPrimitive) -> Profile {
    Profile {
        name: name.to_owned(),
        palette,
        count: CountRule::Fixed { count: 0 },
        size: Span::new(1.0, 4.0),
        speed: Span::new(0.2, 0.7),
        opacity: Span::new(0.3, 0.8),
        pulse_speed: Span::new(0.01, 0.03),
        modulation: Modulation::NONE,
        motion,
        primitive,
        links: None,
        trail: TrailMode::Clear,
        blend: BlendMode::Screen,
        frame_interval_ms: BASELINE_FRAME_INTERVAL_MS,
        dpr_cap: DPR_CAP,
        idle: IdleBehavior::default(),
        spawn: None,
        layer: LayerStyle::default(),
        scroll_response: 0.0,
    }
}

fn aurora() -> Profile {
    let motion = MotionLaw::Orbit(OrbitParams {
        layout: OrbitLayout::Scatter {
            radius_x: 50.0,
            radius_y: 30.0,
        },
        speed_scale: 0.01,
        y_frequency: 0.5,
        drift_amplitude: 30.0,
        drift_rate: 0.0005,
        pull_threshold: 0.0,
        pull_strength: 0.0,
        center_follow: 0.0,
    });
    let primitive = RenderPrimitive::Glow(GlowStyle {
        radius_scale: 8.0,
        stops: [
            StopStyle::new(0.0, 70.0, 60.0, 1.0),
            StopStyle::new(0.3, 60.0, 50.0, 0.5),
            StopStyle::new(1.0, 50.0, 40.0, 0.0),
        ],
        core: Some(CoreStyle {
            radius_scale: 1.0,
            saturation: 100.0,
            lightness: 85.0,
        }),
    });

    Profile {
        count: CountRule::Density {
            px_per_record: AMBIENT_DENSITY_PX2,
        },
        modulation: Modulation {
            opacity_floor: 0.5,
            size_floor: 0.8,
            size_gain: 0.4,
        },
        idle: IdleBehavior {
            gate: IdleGate::ShowWhenIdle,
            suspend_when_hidden: true,
            ..IdleBehavior::default()
        },
        layer: LayerStyle {
            z_index: 5,
            ..LayerStyle::default()
        },
        ..base(
            "aurora",
            Palette(vec![340.0, 170.0, 270.0, 45.0]),
            motion,
            primitive,
        )
    }
}

fn liquid_blobs() -> Profile {
    let motion = MotionLaw::Pursuit(PursuitParams {
        orbit_fraction: 0.3,
        angular_rate: 0.002,
        y_frequency: 0.7,
        influence_radius: 400.0,
        attraction: 0.3,
        smoothing: PURSUIT_SMOOTHING,
        radius_pulse: 30.0,
        pulse_rate: 0.01,
    });
    let primitive = RenderPrimitive::Blob(BlobStyle {
        stops: [
            StopStyle::new(0.0, 70.0, 50.0, 0.15),
            StopStyle::new(0.5, 60.0, 40.0, 0.08),
            StopStyle::new(1.0, 50.0, 30.0, 0.0),
        ],
        bridges: true,
        bridge_alpha: 0.1,
        bridge_blend: BlendMode::Lighter,
    });

    Profile {
        count: CountRule::Fixed { count: 6 },
        size: Span::new(150.0, 350.0),
        speed: Span::new(0.5, 1.0),
        opacity: Span::fixed(1.0),
        pulse_speed: Span::fixed(0.0),
        blend: BlendMode::SourceOver,
        layer: LayerStyle {
            z_index: 0,
            mix_blend: BlendMode::Screen,
            opacity: 0.6,
            // Melts discs and bridges into one metaball field.
            blur_px: 60.0,
        },
        ..base(
            "liquid_blobs",
            Palette(vec![170.0, 270.0, 340.0, 200.0, 300.0]),
            motion,
            primitive,
        )
    }
}

fn vortex() -> Profile {
    let motion = MotionLaw::Orbit(OrbitParams {
        layout: OrbitLayout::Spiral {
            turns: 3.0,
            inner: 50.0,
            outer_fraction: 0.4,
        },
        speed_scale: 1.0,
        y_frequency: 1.0,
        drift_amplitude: 0.0,
        drift_rate: 0.0,
        pull_threshold: 200.0,
        pull_strength: 0.3,
        center_follow: 0.3,
    });
    let primitive = RenderPrimitive::Glow(GlowStyle {
        radius_scale: 4.0,
        stops: [
            StopStyle::new(0.0, 80.0, 70.0, 1.0),
            StopStyle::new(0.5, 70.0, 60.0, 0.5),
            StopStyle::new(1.0, 70.0, 60.0, 0.0),
        ],
        core: None,
    });

    Profile {
        count: CountRule::Fixed { count: 200 },
        size: Span::new(1.0, 3.0),
        speed: Span::new(0.002, 0.005),
        pulse_speed: Span::new(0.002, 0.004),
        modulation: Modulation {
            opacity_floor: 0.6,
            size_floor: 1.0,
            size_gain: 0.0,
        },
        links: Some(LinkStyle {
            threshold: 50.0,
            window: 4,
            alpha: 0.15,
            width: 0.5,
            saturation: 60.0,
            lightness: 60.0,
        }),
        trail: TrailMode::Fade {
            color: Rgba::BACKGROUND,
            alpha: 0.05,
        },
        blend: BlendMode::SourceOver,
        layer: LayerStyle {
            z_index: 2,
            mix_blend: BlendMode::Screen,
            opacity: 0.8,
            blur_px: 0.0,
        },
        scroll_response: 0.01,
        ..base(
            "vortex",
            Palette(vec![170.0, 200.0, 270.0, 300.0, 340.0]),
            motion,
            primitive,
        )
    }
}

fn fluid_lines() -> Profile {
    let motion = MotionLaw::Expand(ExpandParams {
        max_radius: 8.0 / 0.015,
        lifetime_ticks: 1.0 / 0.015,
        easing: Easing::Linear,
        strength_gain: 0.5,
        strength_max: 30.0,
    });
    let primitive = RenderPrimitive::WaveLines(WaveStyle {
        lines: 40,
        step: 20.0,
        time_rate: 0.005,
        amplitude: [20.0, 15.0],
        frequency: [0.005, 0.003],
        drift: 0.7,
        pointer_radius: 300.0,
        pointer_amplitude: 50.0,
        ripple_band: 50.0,
        ripple_frequency: 0.1,
        hue_start: 170.0,
        hue_span: 100.0,
        saturation: 60.0,
        lightness: 55.0,
        alpha_base: 0.03,
        alpha_gain: 0.02,
        scroll_alpha: 0.0005,
        width: 1.5,
    });

    Profile {
        opacity: Span::fixed(1.0),
        spawn: Some(SpawnRule {
            trigger: SpawnTrigger::PointerSpeed { min_speed: 5.0 },
            batch: 1,
            capacity: 20,
        }),
        blend: BlendMode::SourceOver,
        layer: LayerStyle {
            z_index: 0,
            mix_blend: BlendMode::SourceOver,
            opacity: 0.4,
            blur_px: 0.0,
        },
        ..base("fluid_lines", Palette(vec![170.0, 270.0]), motion, primitive)
    }
}

fn scroll_bands() -> Profile {
    let band = |hue: f32, saturation: f32, lightness: f32| Hsla::new(hue, saturation, lightness, 1.0);
    let primitive = RenderPrimitive::ScrollBands(ScrollBandStyle {
        scroll_range: 1_000.0,
        bands: [
            ScrollBand {
                color: band(170.0, 60.0, 55.0),
                anchor: 0.3,
                height: 200.0,
                shift: 100.0,
                opacity: 0.15,
                opacity_gain: 0.005,
                blur: 80.0,
                blur_gain: 0.3,
            },
            ScrollBand {
                color: band(270.0, 50.0, 55.0),
                anchor: 0.5,
                height: 300.0,
                shift: -150.0,
                opacity: 0.1,
                opacity_gain: 0.004,
                blur: 100.0,
                blur_gain: 0.4,
            },
            ScrollBand {
                color: band(340.0, 80.0, 70.0),
                anchor: 0.7,
                height: 250.0,
                shift: 80.0,
                opacity: 0.12,
                opacity_gain: 0.003,
                blur: 90.0,
                blur_gain: 0.35,
            },
        ],
    });

    Profile {
        opacity: Span::fixed(1.0),
        blend: BlendMode::SourceOver,
        layer: LayerStyle {
            z_index: 5,
            mix_blend: BlendMode::SourceOver,
            opacity: 1.0,
            blur_px: 0.0,
        },
        ..base(
            "scroll_bands",
            Palette(vec![170.0, 270.0, 340.0]),
            MotionLaw::Still,
            primitive,
        )
    }
}

fn pointer_glow() -> Profile {
    let motion = MotionLaw::Follow(FollowParams { smoothing: 0.08 });
    let primitive = RenderPrimitive::Spotlight(SpotlightStyle {
        radius: 300.0,
        stops: [
            GradientStop::new(0.0, Hsla::new(170.0, 70.0, 55.0, 0.08)),
            GradientStop::new(0.3, Hsla::new(270.0, 60.0, 55.0, 0.04)),
            GradientStop::new(0.6, Hsla::new(340.0, 70.0, 60.0, 0.02)),
            GradientStop::new(1.0, Hsla::transparent(340.0)),
        ],
        band: Some(WaveBandStyle {
            baseline: 0.5,
            step: 50.0,
            time_rate: 0.0005,
            amplitude: [20.0, 15.0],
            frequency: [0.003, 0.007],
            drift: 1.5,
            pointer_amplitude: 30.0,
            pointer_reach: 2.0,
            pointer_rate: 3.0,
            gradient_top: 0.3,
            color: Hsla::new(270.0, 50.0, 20.0, 0.03),
        }),
    });

    Profile {
        count: CountRule::Fixed { count: 1 },
        size: Span::fixed(1.0),
        opacity: Span::fixed(1.0),
        pulse_speed: Span::fixed(0.0),
        blend: BlendMode::SourceOver,
        // ~30 fps is enough for a glow this soft
        frame_interval_ms: 33.0,
        layer: LayerStyle {
            z_index: 5,
            mix_blend: BlendMode::SourceOver,
            opacity: 1.0,
            blur_px: 0.0,
        },
        ..base("pointer_glow", Palette(vec![170.0, 270.0, 340.0]), motion, primitive)
    }
}

fn light_trail() -> Profile {
    let motion = MotionLaw::Free(FreeParams {
        damping: TRAIL_DAMPING,
        lifetime_ticks: Span::new(60.0, 100.0),
        jitter: 10.0,
        launch_speed: 2.0,
    });
    let primitive = RenderPrimitive::Glow(GlowStyle {
        radius_scale: 3.0,
        stops: [
            StopStyle::new(0.0, 80.0, 70.0, 1.0),
            StopStyle::new(0.5, 60.0, 50.0, 0.5),
            StopStyle::new(1.0, 40.0, 30.0, 0.0),
        ],
        core: Some(CoreStyle {
            radius_scale: 0.5,
            saturation: 100.0,
            lightness: 90.0,
        }),
    });

    Profile {
        size: Span::new(2.0, 6.0),
        opacity: Span::fixed(0.8),
        spawn: Some(SpawnRule {
            trigger: SpawnTrigger::PointerMoving,
            batch: 3,
            capacity: 150,
        }),
        trail: TrailMode::Fade {
            color: Rgba::BACKGROUND,
            alpha: 0.08,
        },
        blend: BlendMode::Screen,
        layer: LayerStyle {
            z_index: 40,
            mix_blend: BlendMode::Screen,
            opacity: 1.0,
            blur_px: 0.0,
        },
        ..base("light_trail", Palette::glow(), motion, primitive)
    }
}

fn click_ripples() -> Profile {
    let motion = MotionLaw::Expand(ExpandParams {
        max_radius: 200.0,
        // 1.5 s at 60 fps
        lifetime_ticks: 90.0,
        easing: Easing::EaseOut,
        strength_gain: 0.0,
        strength_max: 1.0,
    });
    let primitive = RenderPrimitive::Ring(RingStyle {
        stops: [
            StopStyle::new(0.0, 70.0, 60.0, 0.5),
            StopStyle::new(0.4, 70.0, 60.0, 0.25),
            StopStyle::new(0.7, 70.0, 60.0, 0.0),
        ],
    });

    Profile {
        opacity: Span::fixed(0.8),
        spawn: Some(SpawnRule {
            trigger: SpawnTrigger::Click,
            batch: 1,
            capacity: 16,
        }),
        layer: LayerStyle {
            z_index: 50,
            mix_blend: BlendMode::Screen,
            opacity: 1.0,
            blur_px: 0.0,
        },
        ..base("click_ripples", Palette(vec![170.0]), motion, primitive)
    }
}
