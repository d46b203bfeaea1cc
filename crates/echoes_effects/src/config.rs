//! # Profile Configuration
//!
//! Profiles are tuned in TOML, not code. A file names a global tier and a
//! list of `[[profile]]` entries, each starting from a preset and
//! overriding any configurable knob:
//!
//! ```toml
//! tier = "balanced"
//!
//! [[profile]]
//! preset = "aurora"
//! count = { kind = "density", px_per_record = 12000.0 }
//! palette = [340.0, 170.0]
//!
//! [[profile]]
//! preset = "light_trail"
//! trail = { kind = "fade", color = { r = 0, g = 0, b = 0, a = 1.0 }, alpha = 0.1 }
//! ```
//!
//! Resolution order: preset → tier → explicit overrides → validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use echoes_shared::{Palette, Span};

use crate::canvas::BlendMode;
use crate::error::EffectResult;
use crate::presets::Preset;
use crate::profile::{
    CountRule, IdleBehavior, LayerStyle, PerformanceTier, Profile, TrailMode,
};

/// One `[[profile]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverride {
    /// Preset to start from.
    pub preset: Preset,
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Per-entry tier (defaults to the file's tier).
    #[serde(default)]
    pub tier: Option<PerformanceTier>,
    /// Record count or density.
    #[serde(default)]
    pub count: Option<CountRule>,
    /// Hue palette.
    #[serde(default)]
    pub palette: Option<Palette>,
    /// Size range.
    #[serde(default)]
    pub size: Option<Span>,
    /// Speed range.
    #[serde(default)]
    pub speed: Option<Span>,
    /// Opacity range.
    #[serde(default)]
    pub opacity: Option<Span>,
    /// Pulse frequency range.
    #[serde(default)]
    pub pulse_speed: Option<Span>,
    /// Frame-rate cap expressed as a minimum interval (ms).
    #[serde(default)]
    pub frame_interval_ms: Option<f64>,
    /// DPR cap.
    #[serde(default)]
    pub dpr_cap: Option<f32>,
    /// Record compositing.
    #[serde(default)]
    pub blend: Option<BlendMode>,
    /// Trail persistence.
    #[serde(default)]
    pub trail: Option<TrailMode>,
    /// Idle handling.
    #[serde(default)]
    pub idle: Option<IdleBehavior>,
    /// Layer placement.
    #[serde(default)]
    pub layer: Option<LayerStyle>,
    /// Spawn store cap.
    #[serde(default)]
    pub spawn_capacity: Option<usize>,
    /// Scroll response.
    #[serde(default)]
    pub scroll_response: Option<f32>,
}

impl ProfileOverride {
    /// Entry that just names a preset.
    #[must_use]
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            name: None,
            tier: None,
            count: None,
            palette: None,
            size: None,
            speed: None,
            opacity: None,
            pulse_speed: None,
            frame_interval_ms: None,
            dpr_cap: None,
            blend: None,
            trail: None,
            idle: None,
            layer: None,
            spawn_capacity: None,
            scroll_response: None,
        }
    }

    /// Builds and validates the profile.
    pub fn resolve(&self, default_tier: PerformanceTier) -> EffectResult<Profile> {
        let mut profile = self
            .preset
            .profile()
            .with_tier(self.tier.unwrap_or(default_tier));

        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(count) = self.count {
            profile.count = count;
        }
        if let Some(palette) = &self.palette {
            profile.palette = palette.clone();
        }
        if let Some(size) = self.size {
            profile.size = size;
        }
        if let Some(speed) = self.speed {
            profile.speed = speed;
        }
        if let Some(opacity) = self.opacity {
            profile.opacity = opacity;
        }
        if let Some(pulse_speed) = self.pulse_speed {
            profile.pulse_speed = pulse_speed;
        }
        if let Some(interval) = self.frame_interval_ms {
            profile.frame_interval_ms = interval;
        }
        if let Some(cap) = self.dpr_cap {
            profile.dpr_cap = cap;
        }
        if let Some(blend) = self.blend {
            profile.blend = blend;
        }
        if let Some(trail) = self.trail {
            profile.trail = trail;
        }
        if let Some(idle) = self.idle {
            profile.idle = idle;
        }
        if let Some(layer) = self.layer {
            profile.layer = layer;
        }
        if let (Some(cap), Some(spawn)) = (self.spawn_capacity, profile.spawn.as_mut()) {
            spawn.capacity = cap;
        }
        if let Some(response) = self.scroll_response {
            profile.scroll_response = response;
        }

        profile.validate()?;
        Ok(profile)
    }
}

/// A profile file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Tier applied to entries without their own.
    #[serde(default)]
    pub tier: PerformanceTier,
    /// Profile entries, in layer order.
    #[serde(default, rename = "profile")]
    pub profiles: Vec<ProfileOverride>,
}

impl ProfileConfig {
    /// Every preset at `tier`.
    #[must_use]
    pub fn all_presets(tier: PerformanceTier) -> Self {
        Self {
            tier,
            profiles: Preset::ALL.into_iter().map(ProfileOverride::preset).collect(),
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> EffectResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> EffectResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Resolves every entry into a validated profile.
    pub fn resolve(&self) -> EffectResult<Vec<Profile>> {
        let profiles = self
            .profiles
            .iter()
            .map(|entry| entry.resolve(self.tier))
            .collect::<EffectResult<Vec<_>>>()?;

        tracing::debug!(count = profiles.len(), tier = ?self.tier, "profiles resolved");
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EffectError;

    #[test]
    fn test_minimal_file() {
        let config = ProfileConfig::from_toml_str(
            r#"
            [[profile]]
            preset = "vortex"
            "#,
        );
        let profiles = config.and_then(|c| c.resolve());
        let profiles = profiles.unwrap_or_default();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "vortex");
        assert_eq!(profiles[0].count, CountRule::Fixed { count: 120 });
        assert_eq!(profiles[0].dpr_cap, 1.5);
    }

    #[test]
    fn test_overrides_win_over_tier() {
        let config = ProfileConfig::from_toml_str(
            r#"
            tier = "low"

            [[profile]]
            preset = "aurora"
            name = "hero-aurora"
            frame_interval_ms = 50.0
            count = { kind = "density", px_per_record = 10000.0 }
            opacity = { min = 0.2, max = 0.6 }
            "#,
        );
        let profile = config
            .and_then(|c| c.resolve())
            .ok()
            .and_then(|mut v| v.pop());
        let Some(profile) = profile else {
            panic!("profile did not resolve");
        };
        assert_eq!(profile.name, "hero-aurora");
        assert_eq!(profile.frame_interval_ms, 50.0);
        assert_eq!(profile.dpr_cap, 1.0);
        assert_eq!(profile.count, CountRule::Density { px_per_record: 10_000.0 });
        assert_eq!(profile.opacity, Span::new(0.2, 0.6));
    }

    #[test]
    fn test_unknown_preset_is_config_error() {
        let result = ProfileConfig::from_toml_str("[[profile]]\npreset = \"sparkles\"\n");
        assert!(matches!(result, Err(EffectError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let result = ProfileConfig::from_toml_str(
            "[[profile]]\npreset = \"light_trail\"\nopacity = { min = 0.9, max = 0.1 }\n",
        )
        .and_then(|c| c.resolve());
        assert!(matches!(result, Err(EffectError::InvalidProfile { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ProfileConfig::from_toml_file("/nonexistent/echoes/profiles.toml");
        assert!(matches!(result, Err(EffectError::Io(_))));
    }
}
