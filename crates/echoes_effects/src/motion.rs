//! # Update Stage
//!
//! Advances every record by one tick according to the profile's
//! [`MotionLaw`]. Motion is closed-form trigonometry plus explicit Euler
//! steps; nothing here collides or integrates forces.
//!
//! ```text
//!   Orbit    angle += speed            pos = centre + polar(angle, r * (1 - pull*k)) + drift
//!   Pursuit  target = lissajous + lean pos += (target - pos) * s
//!   Follow   target = pointer          pos += (target - pos) * s
//!   Free     life -= decay             pos += vel, vel *= damping
//!   Expand   life -= decay             radius = max * easing(1 - life)
//!   Still    nothing moves
//! ```
//!
//! After every update a record's modulated size and opacity are clamped
//! into the profile envelope.

use std::f32::consts::PI;

use echoes_input::InputSnapshot;
use echoes_shared::{influence, pulse, Smoothed, Vec2};

use crate::profile::{
    ExpandParams, FollowParams, FreeParams, IdleGate, MotionLaw, OrbitParams, Profile,
    PursuitParams, WaveStyle,
};
use crate::record::{FieldBlob, PointParticle, Record};
use crate::store::ParticleStore;

/// Read-only inputs of one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Host time (ms).
    pub time_ms: f64,
    /// Executed ticks before this one.
    pub tick: u64,
    /// Surface size (CSS pixels).
    pub bounds: Vec2,
    /// Input for this tick.
    pub input: &'a InputSnapshot,
}

impl TickContext<'_> {
    /// Host time as `f32` for trigonometry.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time_ms as f32
    }
}

/// Advances every record one tick.
pub fn advance(store: &mut ParticleStore, profile: &Profile, ctx: &TickContext<'_>) {
    match profile.motion {
        MotionLaw::Orbit(params) => {
            let centre = orbit_centre(ctx, &params);
            let boost = 1.0 + ctx.input.scroll_velocity * profile.scroll_response;
            for_each_point(store, |p| {
                step_orbit(p, &params, centre, boost, ctx);
                modulate(p, profile, ctx.time());
            });
        }
        MotionLaw::Pursuit(params) => {
            let size = profile.size_envelope();
            for record in store.records_mut() {
                if let Record::Blob(b) = record {
                    step_pursuit(b, &params, ctx);
                    b.radius = size.clamp(b.radius);
                }
            }
        }
        MotionLaw::Follow(params) => {
            for_each_point(store, |p| step_follow(p, &params, ctx.input.pointer, profile));
        }
        MotionLaw::Free(params) => for_each_point(store, |p| step_free(p, &params, profile)),
        MotionLaw::Expand(params) => for_each_point(store, |p| step_expand(p, &params, profile)),
        MotionLaw::Still => {}
    }
}

fn for_each_point(store: &mut ParticleStore, mut f: impl FnMut(&mut PointParticle)) {
    for record in store.records_mut() {
        if let Record::Point(p) = record {
            f(p);
        }
    }
}

/// Shared orbit centre: surface centre leaning toward the pointer.
fn orbit_centre(ctx: &TickContext<'_>, params: &OrbitParams) -> Vec2 {
    let centre = ctx.bounds * 0.5;
    match ctx.input.pointer {
        Some(pointer) => centre + (pointer - centre) * params.center_follow,
        None => centre,
    }
}

fn step_orbit(p: &mut PointParticle, params: &OrbitParams, centre: Vec2, boost: f32, ctx: &TickContext<'_>) {
    p.angle += p.speed * params.speed_scale * boost;

    let pull = ctx
        .input
        .pointer
        .map_or(0.0, |pointer| influence(pointer.distance(p.position), params.pull_threshold));
    let radius = p.orbit * (1.0 - pull * params.pull_strength);

    let drift = if params.drift_amplitude > 0.0 {
        (ctx.time() * params.drift_rate + p.pulse_offset).sin() * params.drift_amplitude
    } else {
        0.0
    };

    let origin = p.anchor.unwrap_or(centre);
    p.position = origin
        + Vec2::new(
            p.angle.cos() * radius.x + drift,
            (p.angle * params.y_frequency).sin() * radius.y,
        );
}

/// Pulse-modulates size and opacity, clamped into the profile envelope.
fn modulate(p: &mut PointParticle, profile: &Profile, time: f32) {
    let m = profile.modulation;
    let beat = pulse(time, p.pulse_speed, p.pulse_offset);

    p.shimmer = m.opacity_floor + beat * (1.0 - m.opacity_floor);
    p.current_opacity = profile.opacity_envelope().clamp(p.opacity * p.shimmer);
    p.current_size = profile
        .size_envelope()
        .clamp(p.size * (m.size_floor + beat * m.size_gain));
}

fn step_pursuit(b: &mut FieldBlob, params: &PursuitParams, ctx: &TickContext<'_>) {
    b.angle += params.angular_rate * b.speed;

    let centre = ctx.bounds * 0.5;
    let mut target = centre
        + Vec2::new(
            (b.angle + b.phase).cos() * ctx.bounds.x * params.orbit_fraction,
            (b.angle * params.y_frequency + b.phase).sin() * ctx.bounds.y * params.orbit_fraction,
        );

    if let Some(pointer) = ctx.input.pointer {
        let offset = pointer - b.position;
        let pull = influence(offset.length(), params.influence_radius);
        target += offset * (pull * params.attraction);
    }

    b.target = target;
    b.position = b.position.ease_toward(target, params.smoothing);
    b.pulse_phase += params.pulse_rate;
    b.radius = b.base_radius + b.pulse_phase.sin() * params.radius_pulse;
}

fn step_follow(p: &mut PointParticle, params: &FollowParams, pointer: Option<Vec2>, profile: &Profile) {
    if let Some(pointer) = pointer {
        p.position = p.position.ease_toward(pointer, params.smoothing);
    }
    p.current_opacity = profile.opacity_envelope().clamp(p.opacity);
    p.current_size = profile.size_envelope().clamp(p.size);
}

fn step_free(p: &mut PointParticle, params: &FreeParams, profile: &Profile) {
    if let Some(life) = p.life.as_mut() {
        *life -= p.life_decay;
    }
    p.position += p.velocity;
    p.velocity *= params.damping;

    let life = p.life_fraction();
    p.current_opacity = profile.opacity_envelope().clamp(p.opacity * life);
    p.current_size = profile.size_envelope().clamp(p.size * life);
}

fn step_expand(p: &mut PointParticle, params: &ExpandParams, profile: &Profile) {
    if let Some(life) = p.life.as_mut() {
        *life -= p.life_decay;
    }
    let eased = params.easing.apply(1.0 - p.life_fraction());

    p.ring_radius = params.max_radius * eased;
    p.current_size = p.ring_radius;
    p.current_opacity = profile.opacity_envelope().clamp(p.opacity * (1.0 - eased));
}

// ============================================================================
// WAVE FIELD
// ============================================================================

/// A ripple as seen by the wave field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    /// Centre.
    pub center: Vec2,
    /// Current ring radius.
    pub radius: f32,
    /// Displacement strength.
    pub strength: f32,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
}

impl Ripple {
    /// Collects the live ripples of a store.
    #[must_use]
    pub fn collect(store: &ParticleStore) -> Vec<Self> {
        store
            .points()
            .filter(|p| p.is_alive())
            .map(|p| Self {
                center: p.position,
                radius: p.ring_radius,
                strength: p.strength,
                life: p.life_fraction(),
            })
            .collect()
    }
}

/// Vertical displacement of a wave line at `x`.
///
/// `progress` is the line's index over the line count; `phase` is the wave
/// time (`tick * time_rate`).
#[must_use]
pub fn wave_offset(
    x: f32,
    base_y: f32,
    progress: f32,
    phase: f32,
    pointer: Option<Vec2>,
    ripples: &[Ripple],
    style: &WaveStyle,
) -> f32 {
    let mut offset = (x * style.frequency[0] + phase + progress * PI).sin() * style.amplitude[0]
        + (x * style.frequency[1] - phase * style.drift).sin() * style.amplitude[1];

    let here = Vec2::new(x, base_y);
    if let Some(pointer) = pointer {
        let pull = influence(here.distance(pointer), style.pointer_radius);
        offset += pull * style.pointer_amplitude * (phase * 3.0).sin();
    }

    for ripple in ripples {
        let d = here.distance(ripple.center);
        let band = (d - ripple.radius).abs();
        if band < style.ripple_band {
            let weight = (1.0 - band / style.ripple_band) * ripple.life;
            offset += (d * style.ripple_frequency).sin() * ripple.strength * weight;
        }
    }
    offset
}

// ============================================================================
// IDLE FADE
// ============================================================================

/// Layer opacity eased toward the idle gate's target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityFade {
    /// Current opacity.
    level: Smoothed,
    /// Gate in force.
    gate: IdleGate,
}

impl VisibilityFade {
    /// Starts hidden for show-when-idle effects, visible otherwise.
    #[must_use]
    pub fn new(gate: IdleGate, rate: f32) -> Self {
        let initial = match gate {
            IdleGate::ShowWhenIdle => 0.0,
            IdleGate::Ignore | IdleGate::HideWhenIdle => 1.0,
        };
        Self {
            level: Smoothed::new(initial, rate),
            gate,
        }
    }

    /// Target opacity for an idle flag.
    #[must_use]
    pub fn target(&self, idle: bool) -> f32 {
        match (self.gate, idle) {
            (IdleGate::Ignore, _) | (IdleGate::ShowWhenIdle, true) | (IdleGate::HideWhenIdle, false) => 1.0,
            (IdleGate::ShowWhenIdle, false) | (IdleGate::HideWhenIdle, true) => 0.0,
        }
    }

    /// Eases one tick toward the target; returns the new opacity.
    pub fn update(&mut self, idle: bool) -> f32 {
        let target = self.target(idle);
        let next = self.level.step(target).clamp(0.0, 1.0);
        self.level.set_immediate(next);
        next
    }

    /// Current opacity in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.level.value()
    }

    /// True while too faint to be worth drawing.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.opacity() <= echoes_shared::constants::VISIBILITY_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    fn ctx(input: &InputSnapshot, tick: u64) -> TickContext<'_> {
        TickContext {
            time_ms: tick as f64 * 42.0,
            tick,
            bounds: Vec2::new(1280.0, 720.0),
            input,
        }
    }

    #[test]
    fn test_orbit_stays_in_envelope() {
        let profile = Preset::Aurora.profile();
        let mut store = ParticleStore::new(11);
        store.reseed(60, &profile, Vec2::new(1280.0, 720.0));
        let input = InputSnapshot::default();

        for tick in 0..300 {
            advance(&mut store, &profile, &ctx(&input, tick));
            for p in store.points() {
                assert!(profile.opacity_envelope().contains(p.current_opacity));
                assert!(profile.size_envelope().contains(p.current_size));
            }
        }
    }

    #[test]
    fn test_anchored_orbit_stays_near_anchor() {
        let profile = Preset::Aurora.profile();
        let mut store = ParticleStore::new(4);
        store.reseed(10, &profile, Vec2::new(1280.0, 720.0));
        let input = InputSnapshot::default();

        for tick in 0..100 {
            advance(&mut store, &profile, &ctx(&input, tick));
        }
        for p in store.points() {
            let anchor = p.anchor.unwrap_or(Vec2::ZERO);
            assert!((p.position.x - anchor.x).abs() <= 80.0 + 1e-3);
            assert!((p.position.y - anchor.y).abs() <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn test_pointer_contracts_vortex() {
        let profile = Preset::Vortex.profile();
        let mut store = ParticleStore::new(2);
        store.reseed(50, &profile, Vec2::new(1280.0, 720.0));
        let centre = Vec2::new(640.0, 360.0);
        let input = InputSnapshot::at(centre);

        advance(&mut store, &profile, &ctx(&input, 0));
        for p in store.points() {
            let r = p.position.distance(centre);
            assert!(r <= p.orbit.x + 1e-3);
        }
    }

    #[test]
    fn test_follower_eases_toward_pointer() {
        let profile = Preset::PointerGlow.profile();
        let mut store = ParticleStore::new(3);
        store.reseed(1, &profile, Vec2::new(1280.0, 720.0));
        let pointer = Vec2::new(1040.0, 360.0);
        let input = InputSnapshot::at(pointer);

        advance(&mut store, &profile, &ctx(&input, 0));
        // 8% of the 400 px gap.
        let first = store.points().next().map_or(Vec2::ZERO, |p| p.position);
        assert!(first.distance(Vec2::new(672.0, 360.0)) < 1e-3);

        let mut gap = f32::MAX;
        for tick in 1..120 {
            advance(&mut store, &profile, &ctx(&input, tick));
            let d = store.points().next().map_or(f32::MAX, |p| p.position.distance(pointer));
            assert!(d < gap);
            gap = d;
        }
        assert!(gap < 1.0);
    }

    #[test]
    fn test_follower_rests_without_pointer() {
        let profile = Preset::PointerGlow.profile();
        let mut store = ParticleStore::new(3);
        store.reseed(1, &profile, Vec2::new(1280.0, 720.0));
        let input = InputSnapshot::default();

        advance(&mut store, &profile, &ctx(&input, 0));
        let position = store.points().next().map(|p| p.position);
        assert_eq!(position, Some(Vec2::new(640.0, 360.0)));
    }

    #[test]
    fn test_free_life_decreases() {
        let profile = Preset::LightTrail.profile();
        let mut store = ParticleStore::new(6);
        store.spawn(Vec2::new(200.0, 200.0), 3, &profile);
        let input = InputSnapshot::default();

        let mut last: Vec<f32> = store.points().filter_map(|p| p.life).collect();
        for tick in 0..20 {
            advance(&mut store, &profile, &ctx(&input, tick));
            let now: Vec<f32> = store.points().filter_map(|p| p.life).collect();
            for (before, after) in last.iter().zip(&now) {
                assert!(after < before);
            }
            last = now;
        }
    }

    #[test]
    fn test_expand_grows_and_fades() {
        let profile = Preset::ClickRipples.profile();
        let mut store = ParticleStore::new(6);
        store.spawn(Vec2::new(50.0, 50.0), 1, &profile);
        let input = InputSnapshot::default();

        let mut radius = 0.0;
        let mut opacity = 1.0;
        for tick in 0..89 {
            advance(&mut store, &profile, &ctx(&input, tick));
            let Some(p) = store.points().next() else {
                panic!("ripple vanished");
            };
            assert!(p.ring_radius > radius);
            assert!(p.current_opacity < opacity);
            radius = p.ring_radius;
            opacity = p.current_opacity;
        }
        assert!(radius <= 200.0);
    }

    #[test]
    fn test_wave_offset_is_bounded_without_input() {
        let profile = Preset::FluidLines.profile();
        let crate::profile::RenderPrimitive::WaveLines(style) = profile.primitive else {
            panic!("fluid lines draw wave lines");
        };
        for i in 0..100 {
            let x = i as f32 * 20.0;
            let off = wave_offset(x, 300.0, 0.5, 1.3, None, &[], &style);
            assert!(off.abs() <= 35.0 + 1e-3);
        }
    }

    #[test]
    fn test_ripple_displaces_its_band() {
        let profile = Preset::FluidLines.profile();
        let crate::profile::RenderPrimitive::WaveLines(style) = profile.primitive else {
            panic!("fluid lines draw wave lines");
        };
        let ripple = Ripple {
            center: Vec2::new(0.0, 0.0),
            radius: 100.0,
            strength: 30.0,
            life: 1.0,
        };
        let x = 105.0;
        let plain = wave_offset(x, 0.0, 0.0, 0.0, None, &[], &style);
        let rippled = wave_offset(x, 0.0, 0.0, 0.0, None, &[ripple], &style);
        let expected = (105.0_f32 * 0.1).sin() * 30.0 * 0.9;
        assert!((rippled - plain - expected).abs() < 1e-3);

        let far = wave_offset(400.0, 0.0, 0.0, 0.0, None, &[ripple], &style);
        assert_eq!(far, wave_offset(400.0, 0.0, 0.0, 0.0, None, &[], &style));
    }

    #[test]
    fn test_visibility_fade() {
        let mut fade = VisibilityFade::new(IdleGate::ShowWhenIdle, 0.02);
        assert!(fade.is_hidden());

        let mut last = fade.opacity();
        for _ in 0..300 {
            let next = fade.update(true);
            assert!(next >= last && next <= 1.0);
            last = next;
        }
        assert!(last > 0.99);

        let next = fade.update(false);
        assert!(next < last);
        assert!(last - next < 0.05);
    }
}
