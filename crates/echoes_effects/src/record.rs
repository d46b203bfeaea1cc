//! Simulation records.
//!
//! Two shapes cover every effect: [`PointParticle`] (glows, trails, rings)
//! and [`FieldBlob`] (large soft blobs that chase a target). Which fields a
//! record actually uses depends on the profile's motion law.

use echoes_shared::Vec2;

/// A small moving point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointParticle {
    /// Current position (CSS pixels).
    pub position: Vec2,
    /// Orbit centre for anchored orbits. `None` orbits the shared centre.
    pub anchor: Option<Vec2>,
    /// Orbit radii (x, y).
    pub orbit: Vec2,
    /// Base size.
    pub size: f32,
    /// Palette hue.
    pub hue: f32,
    /// Orbit angle (radians).
    pub angle: f32,
    /// Angular or linear speed, per law.
    pub speed: f32,
    /// Base opacity.
    pub opacity: f32,
    /// Pulse frequency (radians per ms).
    pub pulse_speed: f32,
    /// Pulse and drift phase.
    pub pulse_offset: f32,
    /// Velocity (free law).
    pub velocity: Vec2,
    /// Remaining life in `[0, 1]`. `None` for immortal records.
    pub life: Option<f32>,
    /// Life lost per tick.
    pub life_decay: f32,
    /// Ring radius (expand law).
    pub ring_radius: f32,
    /// Ripple strength (expand law).
    pub strength: f32,
    /// Size after modulation, as drawn.
    pub current_size: f32,
    /// Opacity after modulation, as drawn.
    pub current_opacity: f32,
    /// Last modulation factor (links breathe with it).
    pub shimmer: f32,
}

impl PointParticle {
    /// True if the record must be drawn and kept.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life.map_or(true, |life| life > 0.0)
    }

    /// Life clamped to `[0, 1]` (1 for immortal records).
    #[must_use]
    pub fn life_fraction(&self) -> f32 {
        self.life.map_or(1.0, |life| life.clamp(0.0, 1.0))
    }
}

/// A large soft blob easing toward a moving target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldBlob {
    /// Eased position.
    pub position: Vec2,
    /// Where the blob is heading.
    pub target: Vec2,
    /// Current (pulsing) radius.
    pub radius: f32,
    /// Radius the pulse oscillates around.
    pub base_radius: f32,
    /// Palette hue.
    pub hue: f32,
    /// Radius pulse phase.
    pub pulse_phase: f32,
    /// Angular speed multiplier.
    pub speed: f32,
    /// Path angle.
    pub angle: f32,
    /// Per-blob path offset (its index).
    pub phase: f32,
}

/// One stored record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    /// Point particle.
    Point(PointParticle),
    /// Field blob.
    Blob(FieldBlob),
}

impl Record {
    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        match self {
            Self::Point(p) => p.position,
            Self::Blob(b) => b.position,
        }
    }

    /// Palette hue.
    #[must_use]
    pub fn hue(&self) -> f32 {
        match self {
            Self::Point(p) => p.hue,
            Self::Blob(b) => b.hue,
        }
    }

    /// False once a finite-life record has run out.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        match self {
            Self::Point(p) => p.is_alive(),
            Self::Blob(_) => true,
        }
    }

    /// The point particle, if this is one.
    #[must_use]
    pub fn as_point(&self) -> Option<&PointParticle> {
        match self {
            Self::Point(p) => Some(p),
            Self::Blob(_) => None,
        }
    }

    /// The field blob, if this is one.
    #[must_use]
    pub fn as_blob(&self) -> Option<&FieldBlob> {
        match self {
            Self::Blob(b) => Some(b),
            Self::Point(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_rules() {
        let immortal = PointParticle::default();
        assert!(immortal.is_alive());
        assert_eq!(immortal.life_fraction(), 1.0);

        let spent = PointParticle {
            life: Some(-0.01),
            ..PointParticle::default()
        };
        assert!(!Record::Point(spent).is_alive());
        assert_eq!(spent.life_fraction(), 0.0);
    }
}
