//! End-to-end properties of the effect engine: reseeding, lifetimes, caps,
//! easing convergence, idle fades, frame throttling, teardown and the
//! pointer-glow and scroll-band layers.

use std::rc::Rc;

use echoes_effects::{
    advance, DrawCommand, Effect, FrameDecision, LoopState, ManualFrameHost, MotionLaw,
    ParticleStore, Preset, RecordingCanvas, Record, SpawnRule, SpawnTrigger, TickContext, Viewport,
};
use echoes_input::{ActivityKind, InputHub, InputProvider, InputSnapshot, SharedInput, StaticInput};
use echoes_shared::{Vec2, IDLE_TIMEOUT_MS};

const DESKTOP: Viewport = Viewport::new(1920.0, 1080.0, 1.0);

fn recording(preset: Preset, input: StaticInput) -> Effect<RecordingCanvas, StaticInput> {
    Effect::new(preset.profile(), Some(RecordingCanvas::new()), input, 11)
}

fn ctx(input: &InputSnapshot, tick: u64, bounds: Vec2) -> TickContext<'_> {
    TickContext {
        time_ms: tick as f64 * 42.0,
        tick,
        bounds,
        input,
    }
}

// ============================================================================
// RESEED
// ============================================================================

#[test]
fn test_reseed_count_and_ranges() {
    let mut effect = recording(Preset::Aurora, StaticInput::default());
    let size = effect.resize(DESKTOP).expect("surface available");
    let profile = effect.profile().clone();

    let expected = profile.count.resolve(size.css_width, size.css_height);
    assert_eq!(expected, 138);
    assert_eq!(effect.store().len(), expected);

    for p in effect.store().points() {
        assert!(profile.size.contains(p.size), "size {}", p.size);
        assert!(profile.speed.contains(p.speed), "speed {}", p.speed);
        assert!(profile.opacity.contains(p.opacity), "opacity {}", p.opacity);
        assert!(profile.pulse_speed.contains(p.pulse_speed));
        assert!(profile.palette.contains(p.hue), "hue {}", p.hue);
    }
}

#[test]
fn test_resize_places_records_on_surface() {
    for preset in [Preset::Aurora, Preset::Vortex, Preset::LiquidBlobs] {
        let mut effect = recording(preset, StaticInput::default());
        effect.resize(Viewport::new(1024.0, 600.0, 2.0));
        assert!(!effect.store().is_empty(), "{preset} reseeded nothing");

        for record in effect.store().records() {
            let position = record.position();
            assert!(
                position.within(1024.0, 600.0),
                "{preset} record at {position:?}"
            );
        }

        effect.resize(Viewport::new(320.0, 240.0, 1.0));
        for record in effect.store().records() {
            assert!(record.position().within(320.0, 240.0));
        }
    }
}

#[test]
fn test_spawned_effects_start_empty_after_resize() {
    let mut effect = recording(Preset::ClickRipples, StaticInput::default());
    effect.resize(DESKTOP);
    assert!(effect.store().is_empty());
}

// ============================================================================
// LIFETIME AND CAPS
// ============================================================================

#[test]
fn test_life_decreases_until_pruned() {
    let profile = Preset::LightTrail.profile();
    let bounds = Vec2::new(800.0, 600.0);
    let input = InputSnapshot::default();
    let mut store = ParticleStore::new(4);
    store.spawn(Vec2::new(400.0, 300.0), 10, &profile);

    let mut previous: Vec<f32> = store.points().filter_map(|p| p.life).collect();
    assert_eq!(previous.len(), 10);

    for tick in 0..40 {
        advance(&mut store, &profile, &ctx(&input, tick, bounds));
        let current: Vec<f32> = store.points().filter_map(|p| p.life).collect();
        for (before, after) in previous.iter().zip(&current) {
            assert!(after < before, "life went from {before} to {after}");
        }
        previous = current;
    }

    // Longest lifetime is 100 ticks.
    for tick in 40..101 {
        advance(&mut store, &profile, &ctx(&input, tick, bounds));
    }
    assert_eq!(store.prune(), 10);
    assert!(store.is_empty());
}

#[test]
fn test_store_never_exceeds_capacity() {
    let mut profile = Preset::LightTrail.profile();
    profile.spawn = Some(SpawnRule {
        trigger: SpawnTrigger::PointerMoving,
        batch: 3,
        capacity: 20,
    });

    let snapshot = InputSnapshot {
        pointer_moving: true,
        ..InputSnapshot::at(Vec2::new(200.0, 200.0))
    };
    let mut effect = Effect::new(
        profile,
        Some(RecordingCanvas::new()),
        StaticInput::new(snapshot),
        2,
    );
    effect.resize(DESKTOP);

    for tick in 0..50 {
        let report = effect.tick(f64::from(tick) * 42.0).expect("effect is live");
        assert!(report.records <= 20, "tick {tick}: {} records", report.records);
    }
    assert_eq!(effect.store().len(), 20);
    assert_eq!(effect.stats().spawned_total, 150);

    // Displaced records count as pruned, so the totals balance.
    let stats = effect.stats();
    assert_eq!(stats.spawned_total - stats.pruned_total, 20);
}

#[test]
fn test_fast_sweep_between_ticks_keeps_every_ripple() {
    let hub: SharedInput = InputHub::new(IDLE_TIMEOUT_MS, 0.0).shared();
    let mut effect = Effect::new(
        Preset::FluidLines.profile(),
        Some(RecordingCanvas::new()),
        Rc::clone(&hub),
        5,
    );
    effect.resize(DESKTOP);

    // Six 40 px moves at 8 ms intervals land inside one 42 ms frame.
    for i in 0..7 {
        hub.borrow_mut().pointer_moved(100.0 + 40.0 * i as f32, 300.0, 8.0 * f64::from(i));
    }
    let report = effect.tick(50.0).expect("effect is live");
    assert_eq!(report.spawned, 6);
    assert!(effect.store().points().all(|p| p.strength == 20.0));

    let report = effect.tick(92.0).expect("effect is live");
    assert_eq!(report.spawned, 0);
}

#[test]
fn test_pointer_at_origin_spawns_nothing() {
    let snapshot = InputSnapshot {
        pointer_moving: true,
        ..InputSnapshot::at(Vec2::ZERO)
    };
    let mut effect = recording(Preset::LightTrail, StaticInput::new(snapshot));
    effect.resize(DESKTOP);
    let report = effect.tick(0.0).expect("effect is live");
    assert_eq!(report.spawned, 0);
}

// ============================================================================
// SMOOTHING
// ============================================================================

#[test]
fn test_blob_converges_on_fixed_target() {
    let mut profile = Preset::LiquidBlobs.profile();
    if let MotionLaw::Pursuit(params) = &mut profile.motion {
        params.angular_rate = 0.0;
    }
    let bounds = Vec2::new(1000.0, 800.0);
    let input = InputSnapshot::default();
    let mut store = ParticleStore::new(21);
    store.reseed(1, &profile, bounds);

    advance(&mut store, &profile, &ctx(&input, 0, bounds));
    let target = store.blobs().next().map(|b| b.target).expect("one blob");
    if let Some(Record::Blob(blob)) = store.records_mut().first_mut() {
        blob.position = target + Vec2::new(50.0, 0.0);
    }

    let mut distance = 50.0;
    for tick in 1..=200 {
        advance(&mut store, &profile, &ctx(&input, tick, bounds));
        let blob = store.blobs().next().expect("one blob");
        assert_eq!(blob.target, target);
        let next = blob.position.distance(target);
        assert!(next < distance, "tick {tick}: {next} >= {distance}");
        distance = next;
    }
    assert!(distance < 1.0, "still {distance}px away");
}

// ============================================================================
// IDLE FADE
// ============================================================================

#[test]
fn test_idle_fade_is_monotone_bounded_and_reversible() {
    let hub: SharedInput = InputHub::new(IDLE_TIMEOUT_MS, 0.0).shared();
    let mut effect = Effect::new(
        Preset::Aurora.profile(),
        Some(RecordingCanvas::new()),
        Rc::clone(&hub),
        5,
    );
    effect.resize(DESKTOP);

    // Active page: aurora stays hidden and frozen.
    let report = effect.tick(1_000.0).expect("effect is live");
    assert!(report.suspended);
    assert_eq!(report.opacity, 0.0);

    // Idle: fades in.
    let mut previous = 0.0;
    for i in 0..300 {
        let now = 2_000.0 + f64::from(i) * 42.0;
        let opacity = effect.tick(now).expect("effect is live").opacity;
        assert!((0.0..=1.0).contains(&opacity));
        assert!(opacity >= previous, "fade-in dipped at step {i}");
        previous = opacity;
    }
    assert!(previous > 0.9, "only reached {previous}");

    // Activity: fades back out.
    let resumed = 2_000.0 + 300.0 * 42.0;
    for i in 0..300 {
        let now = resumed + f64::from(i) * 42.0;
        hub.borrow_mut().activity(ActivityKind::KeyPress, now);
        let opacity = effect.tick(now).expect("effect is live").opacity;
        assert!((0.0..=1.0).contains(&opacity));
        assert!(opacity <= previous, "fade-out rose at step {i}");
        previous = opacity;
    }
    assert!(previous < 0.1);
}

// ============================================================================
// FRAME LOOP
// ============================================================================

#[test]
fn test_frame_cap_limits_executed_frames() {
    let mut effect = recording(Preset::Aurora, StaticInput::default());
    let mut host = ManualFrameHost::new();
    effect.resize(DESKTOP);
    effect.start(&mut host);
    assert_eq!(effect.profile().frame_interval_ms, 42.0);

    // 100 callbacks 10 ms apart.
    let decisions: Vec<FrameDecision> = (0..100)
        .map(|i| effect.on_frame(f64::from(i) * 10.0, &mut host))
        .collect();

    let executed = decisions.iter().filter(|d| **d == FrameDecision::Run).count();
    assert_eq!(executed, 20);
    assert!(executed <= (990.0_f64 / 42.0).ceil() as usize + 1);
    assert_eq!(effect.canvas().map(RecordingCanvas::frame_count), Some(20));
    assert_eq!(effect.stats().dropped_frames, 80);
    assert_eq!(host.requested, 101);
}

#[test]
fn test_teardown_cancels_and_detaches() {
    let hub: SharedInput = InputHub::new(IDLE_TIMEOUT_MS, 0.0).shared();
    let mut effect = Effect::new(
        Preset::ClickRipples.profile(),
        Some(RecordingCanvas::new()),
        Rc::clone(&hub),
        8,
    );
    let mut host = ManualFrameHost::new();
    effect.resize(DESKTOP);
    effect.start(&mut host);
    effect.on_frame(0.0, &mut host);

    effect.teardown(&mut host);
    effect.teardown(&mut host);

    assert!(effect.is_torn_down());
    assert_eq!(effect.scheduler().state(), LoopState::Cancelled);
    assert_eq!(host.cancelled, 1);
    assert!(host.outstanding().is_none());
    assert!(!hub.borrow().is_attached());
    assert!(effect.canvas().is_some_and(RecordingCanvas::is_released));

    // Late events and callbacks change nothing.
    hub.borrow_mut().clicked(100.0, 100.0, 50.0);
    assert!(hub.borrow().snapshot(50.0).clicks.is_empty());
    assert_eq!(effect.on_frame(100.0, &mut host), FrameDecision::Stopped);
    assert!(effect.tick(100.0).is_none());
    assert!(effect.store().is_empty());
}

#[test]
fn test_missing_context_is_inert() {
    let mut effect: Effect<RecordingCanvas, StaticInput> =
        Effect::new(Preset::Vortex.profile(), None, StaticInput::default(), 1);
    let mut host = ManualFrameHost::new();

    assert!(effect.is_inert());
    assert!(effect.resize(DESKTOP).is_none());
    effect.start(&mut host);
    assert_eq!(effect.on_frame(0.0, &mut host), FrameDecision::Stopped);
    assert!(effect.tick(0.0).is_none());
    assert_eq!(host.requested, 0);
    assert!(effect.store().is_empty());

    effect.teardown(&mut host);
    assert!(effect.is_torn_down());
}

#[test]
fn test_click_ripples_follow_clicks() {
    let hub: SharedInput = InputHub::new(IDLE_TIMEOUT_MS, 0.0).shared();
    let mut effect = Effect::new(
        Preset::ClickRipples.profile(),
        Some(RecordingCanvas::new()),
        Rc::clone(&hub),
        3,
    );
    effect.resize(DESKTOP);

    hub.borrow_mut().clicked(400.0, 300.0, 10.0);
    hub.borrow_mut().clicked(800.0, 500.0, 20.0);
    let report = effect.tick(42.0).expect("effect is live");
    assert_eq!(report.spawned, 2);

    // Same clicks are not replayed.
    let report = effect.tick(84.0).expect("effect is live");
    assert_eq!(report.spawned, 0);
    assert_eq!(report.records, 2);

    // Ripples expire after their lifetime.
    for i in 2..100 {
        effect.tick(f64::from(i) * 42.0);
    }
    assert!(effect.store().is_empty());
    assert_eq!(effect.stats().pruned_total, 2);
}

// ============================================================================
// POINTER GLOW / SCROLL BANDS
// ============================================================================

#[test]
fn test_pointer_glow_trails_the_pointer() {
    let hub: SharedInput = InputHub::new(IDLE_TIMEOUT_MS, 0.0).shared();
    let mut effect = Effect::new(
        Preset::PointerGlow.profile(),
        Some(RecordingCanvas::new()),
        Rc::clone(&hub),
        4,
    );
    effect.resize(DESKTOP);
    assert_eq!(effect.store().len(), 1);

    let target = Vec2::new(1500.0, 200.0);
    hub.borrow_mut().pointer_moved(target.x, target.y, 10.0);

    let mut gap = f32::MAX;
    for i in 1..=80 {
        let report = effect.tick(f64::from(i) * 33.0).expect("effect is live");
        assert_eq!(report.draw.records_drawn, 1);
        let glow = effect.store().points().next().map(|p| p.position).expect("one glow");
        let d = glow.distance(target);
        assert!(d < gap, "tick {i}: {d} >= {gap}");
        gap = d;
    }
    assert!(gap < 1.0);
}

#[test]
fn test_scroll_bands_brighten_while_scrolling() {
    let hub: SharedInput = InputHub::new(IDLE_TIMEOUT_MS, 0.0).shared();
    let mut effect = Effect::new(
        Preset::ScrollBands.profile(),
        Some(RecordingCanvas::new()),
        Rc::clone(&hub),
        4,
    );
    effect.resize(DESKTOP);
    assert!(effect.store().is_empty());

    let band_alpha = |effect: &mut Effect<RecordingCanvas, SharedInput>| -> Vec<f32> {
        let canvas = effect.canvas_mut().expect("canvas");
        canvas
            .take_commands()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Linear { stops, .. } => Some(stops[1].color.a),
                _ => None,
            })
            .collect()
    };

    effect.tick(0.0);
    let resting = band_alpha(&mut effect);
    assert_eq!(resting.len(), 3);

    hub.borrow_mut().scrolled(0.0, 10.0);
    hub.borrow_mut().scrolled(30.0, 20.0);
    effect.tick(20.0);
    let scrolling = band_alpha(&mut effect);
    for (rest, fast) in resting.iter().zip(&scrolling) {
        assert!(fast > rest);
    }

    // Velocity decays back toward rest.
    effect.tick(5_000.0);
    let settled = band_alpha(&mut effect);
    for (rest, later) in resting.iter().zip(&settled) {
        assert!((later - rest).abs() < 1e-3);
    }
}
