//! # Particle / Field Store
//!
//! Ordered sequence of records for one effect. Three mutations only:
//!
//! - `reseed`: replace everything with `count` fresh records
//! - `spawn`: append a batch near an origin, displacing the oldest past the cap
//! - `prune`: drop records whose life ran out, keeping survivor order
//!
//! Records displaced by the cap are reported by the next `prune`, so every
//! record that leaves the store between reseeds is counted once.
//!
//! Randomness comes from a per-store ChaCha8 stream so a seed reproduces a
//! run exactly.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use echoes_shared::Vec2;

use crate::profile::{MotionLaw, OrbitLayout, OrbitParams, Profile};
use crate::record::{FieldBlob, PointParticle, Record};

/// Records of one effect plus their random source.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    /// Records, oldest first.
    records: Vec<Record>,
    /// Deterministic random stream.
    rng: ChaCha8Rng,
    /// Records displaced by the cap since the last prune.
    displaced: usize,
}

impl ParticleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            records: Vec::with_capacity(256),
            rng: ChaCha8Rng::seed_from_u64(seed),
            displaced: 0,
        }
    }

    /// Replaces all records with `count` fresh ones inside `bounds`.
    ///
    /// An empty surface holds no records.
    pub fn reseed(&mut self, count: usize, profile: &Profile, bounds: Vec2) {
        self.records.clear();
        self.displaced = 0;
        if bounds.x <= 0.0 || bounds.y <= 0.0 {
            tracing::debug!(profile = %profile.name, "empty surface, store cleared");
            return;
        }

        self.records.reserve(count);
        for index in 0..count {
            let record = self.seed_record(index, count, profile, bounds);
            self.records.push(record);
        }
        tracing::debug!(profile = %profile.name, count, "store reseeded");
    }

    /// Appends `n` records near `origin` at full strength.
    ///
    /// Returns the number appended.
    pub fn spawn(&mut self, origin: Vec2, n: usize, profile: &Profile) -> usize {
        self.spawn_with_speed(origin, n, profile, None)
    }

    /// Appends `n` records near `origin`; ripple strength follows `speed`.
    pub fn spawn_with_speed(
        &mut self,
        origin: Vec2,
        n: usize,
        profile: &Profile,
        speed: Option<f32>,
    ) -> usize {
        for _ in 0..n {
            let record = self.spawn_record(origin, profile, speed);
            self.records.push(record);
        }

        if let Some(rule) = profile.spawn {
            if self.records.len() > rule.capacity {
                let excess = self.records.len() - rule.capacity;
                self.records.drain(..excess);
                self.displaced += excess;
            }
        }
        n
    }

    /// Removes records whose life reached zero.
    ///
    /// Returns how many records left the store since the last prune,
    /// counting those the cap displaced.
    pub fn prune(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(Record::is_alive);
        before - self.records.len() + std::mem::take(&mut self.displaced)
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.displaced = 0;
    }

    /// Records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records, mutably.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Point particles, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &PointParticle> {
        self.records.iter().filter_map(Record::as_point)
    }

    /// Field blobs, oldest first.
    pub fn blobs(&self) -> impl Iterator<Item = &FieldBlob> {
        self.records.iter().filter_map(Record::as_blob)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ------------------------------------------------------------------------

    fn seed_record(&mut self, index: usize, count: usize, profile: &Profile, bounds: Vec2) -> Record {
        match profile.motion {
            MotionLaw::Orbit(params) => match params.layout {
                OrbitLayout::Scatter { .. } => {
                    let anchor = self.random_point(bounds);
                    Record::Point(self.orbiter(anchor, profile, &params))
                }
                OrbitLayout::Spiral {
                    turns,
                    inner,
                    outer_fraction,
                } => {
                    let t = index as f32 / count.max(1) as f32;
                    let outer = bounds.x.min(bounds.y) * outer_fraction;
                    let inner = inner.min(outer);
                    let radius = inner + t * (outer - inner);
                    let angle = t * TAU * turns;
                    let centre = bounds * 0.5;

                    let mut p = self.point_base(profile);
                    p.angle = angle;
                    p.orbit = Vec2::new(radius, radius);
                    p.position = centre
                        + Vec2::new(angle.cos() * radius, (angle * params.y_frequency).sin() * radius);
                    Record::Point(p)
                }
            },
            MotionLaw::Pursuit(_) => {
                let position = self.random_point(bounds);
                Record::Blob(self.blob(position, index, profile))
            }
            MotionLaw::Follow(_) => {
                let mut p = self.point_base(profile);
                p.position = bounds * 0.5;
                Record::Point(p)
            }
            MotionLaw::Free(_) | MotionLaw::Expand(_) | MotionLaw::Still => {
                let origin = self.random_point(bounds);
                self.spawn_record(origin, profile, None)
            }
        }
    }

    fn spawn_record(&mut self, origin: Vec2, profile: &Profile, speed: Option<f32>) -> Record {
        match profile.motion {
            MotionLaw::Free(params) => {
                let jitter = Vec2::new(self.centered(), self.centered()) * params.jitter;
                let velocity = Vec2::new(self.centered(), self.centered()) * params.launch_speed;
                let lifetime = params.lifetime_ticks.sample(&mut self.rng).max(1.0);

                let mut p = self.point_base(profile);
                p.position = origin + jitter;
                p.velocity = velocity;
                p.life = Some(1.0);
                p.life_decay = 1.0 / lifetime;
                Record::Point(p)
            }
            MotionLaw::Expand(params) => {
                let mut p = self.point_base(profile);
                p.position = origin;
                p.life = Some(1.0);
                p.life_decay = 1.0 / params.lifetime_ticks.max(1.0);
                p.strength = params.strength_for(speed);
                p.current_size = 0.0;
                Record::Point(p)
            }
            MotionLaw::Orbit(params) => Record::Point(self.orbiter(origin, profile, &params)),
            MotionLaw::Follow(_) | MotionLaw::Still => {
                let mut p = self.point_base(profile);
                p.position = origin;
                Record::Point(p)
            }
            MotionLaw::Pursuit(_) => {
                let index = self.records.len();
                Record::Blob(self.blob(origin, index, profile))
            }
        }
    }

    fn orbiter(&mut self, anchor: Vec2, profile: &Profile, params: &OrbitParams) -> PointParticle {
        let orbit = match params.layout {
            OrbitLayout::Scatter { radius_x, radius_y } => Vec2::new(radius_x, radius_y),
            OrbitLayout::Spiral { inner, .. } => Vec2::new(inner, inner),
        };
        let mut p = self.point_base(profile);
        p.anchor = Some(anchor);
        p.position = anchor;
        p.orbit = orbit;
        p.angle = self.rng.gen_range(0.0..TAU);
        p
    }

    fn blob(&mut self, position: Vec2, index: usize, profile: &Profile) -> FieldBlob {
        let base_radius = profile.size.sample(&mut self.rng);
        FieldBlob {
            position,
            target: position,
            radius: base_radius,
            base_radius,
            hue: profile.palette.cycle(index),
            pulse_phase: self.rng.gen_range(0.0..TAU),
            speed: profile.speed.sample(&mut self.rng),
            angle: self.rng.gen_range(0.0..TAU),
            phase: index as f32,
        }
    }

    /// Fields every point draws from the profile ranges.
    fn point_base(&mut self, profile: &Profile) -> PointParticle {
        let size = profile.size.sample(&mut self.rng);
        let opacity = profile.opacity.sample(&mut self.rng);
        PointParticle {
            size,
            hue: profile.palette.pick(&mut self.rng),
            speed: profile.speed.sample(&mut self.rng),
            opacity,
            pulse_speed: profile.pulse_speed.sample(&mut self.rng),
            pulse_offset: self.rng.gen_range(0.0..TAU),
            current_size: size,
            current_opacity: opacity,
            shimmer: 1.0,
            ..PointParticle::default()
        }
    }

    /// Uniform point in `[0, w) x [0, h)`.
    fn random_point(&mut self, bounds: Vec2) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(0.0..bounds.x),
            self.rng.gen_range(0.0..bounds.y),
        )
    }

    /// Uniform value in `[-0.5, 0.5)`.
    fn centered(&mut self) -> f32 {
        self.rng.gen::<f32>() - 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    #[test]
    fn test_reseed_exact_count() {
        let profile = Preset::Aurora.profile();
        let mut store = ParticleStore::new(1);
        store.reseed(37, &profile, Vec2::new(800.0, 600.0));
        assert_eq!(store.len(), 37);

        store.reseed(5, &profile, Vec2::new(800.0, 600.0));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_empty_surface_holds_nothing() {
        let profile = Preset::Vortex.profile();
        let mut store = ParticleStore::new(1);
        store.reseed(200, &profile, Vec2::new(0.0, 600.0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_same_seed_same_records() {
        let profile = Preset::LiquidBlobs.profile();
        let mut a = ParticleStore::new(99);
        let mut b = ParticleStore::new(99);
        a.reseed(6, &profile, Vec2::new(1024.0, 768.0));
        b.reseed(6, &profile, Vec2::new(1024.0, 768.0));
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn test_blobs_cycle_palette() {
        let profile = Preset::LiquidBlobs.profile();
        let mut store = ParticleStore::new(3);
        store.reseed(6, &profile, Vec2::new(1024.0, 768.0));
        let hues: Vec<f32> = store.blobs().map(|b| b.hue).collect();
        assert_eq!(hues, vec![170.0, 270.0, 340.0, 200.0, 300.0, 170.0]);
    }

    #[test]
    fn test_spawn_displaces_oldest() {
        let profile = Preset::FluidLines.profile();
        let mut store = ParticleStore::new(5);
        for i in 0..25 {
            store.spawn(Vec2::new(i as f32, 0.0), 1, &profile);
        }
        assert_eq!(store.len(), 20);
        let first = store.points().next().map(|p| p.position.x);
        assert_eq!(first, Some(5.0));

        // Displaced records are reported once, by the next prune.
        assert_eq!(store.prune(), 5);
        assert_eq!(store.prune(), 0);
    }

    #[test]
    fn test_follower_starts_at_centre() {
        let profile = Preset::PointerGlow.profile();
        let mut store = ParticleStore::new(2);
        store.reseed(1, &profile, Vec2::new(800.0, 600.0));
        let position = store.points().next().map(|p| p.position);
        assert_eq!(position, Some(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn test_prune_keeps_order() {
        let profile = Preset::LightTrail.profile();
        let mut store = ParticleStore::new(8);
        store.spawn(Vec2::new(100.0, 100.0), 6, &profile);

        for (i, record) in store.records_mut().iter_mut().enumerate() {
            if let Record::Point(p) = record {
                p.hue = i as f32;
                if i % 2 == 0 {
                    p.life = Some(0.0);
                }
            }
        }

        assert_eq!(store.prune(), 3);
        let hues: Vec<f32> = store.points().map(|p| p.hue).collect();
        assert_eq!(hues, vec![1.0, 3.0, 5.0]);
    }
}
