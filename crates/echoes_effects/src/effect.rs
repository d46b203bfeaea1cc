//! # Effect Engine
//!
//! One [`Effect`] is one canvas layer: a surface, a store, an idle fade and
//! a frame loop, all driven by a [`Profile`].
//!
//! Per executed tick, data flows one way:
//!
//! ```text
//!   InputProvider ──► snapshot ──► spawn ──► advance ──► prune ──► paint
//!                                   (store mutations)             (canvas)
//! ```
//!
//! An effect created without a canvas is inert: it logs once and every
//! later call is a silent no-op.

use web_time::Instant;

use echoes_input::{InputProvider, InputSnapshot};

use crate::canvas::Canvas;
use crate::motion::{self, TickContext, VisibilityFade};
use crate::profile::{Profile, SpawnTrigger};
use crate::render;
use crate::scheduler::{FrameDecision, FrameHost, FrameScheduler};
use crate::stats::{DrawStats, EffectStats, TickReport};
use crate::store::ParticleStore;
use crate::surface::{SurfaceManager, SurfaceSize, Viewport};

/// Last input serials this effect acted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InputCursor {
    move_serial: u64,
    click_serial: u64,
}

impl InputCursor {
    fn at(snapshot: &InputSnapshot) -> Self {
        Self {
            move_serial: snapshot.move_serial,
            click_serial: snapshot.last_click_serial(),
        }
    }
}

/// One profile-driven canvas effect.
pub struct Effect<C, I> {
    /// Configuration.
    profile: Profile,
    /// Drawing surface (inert when `None` was supplied).
    surface: SurfaceManager<C>,
    /// Records.
    store: ParticleStore,
    /// Idle fade.
    fade: VisibilityFade,
    /// Frame loop.
    scheduler: FrameScheduler,
    /// Input source.
    input: I,
    /// Input already acted on.
    cursor: InputCursor,
    /// Executed ticks.
    ticks: u64,
    /// Running totals.
    stats: EffectStats,
    /// Set by `teardown`.
    torn_down: bool,
}

impl<C: Canvas, I: InputProvider> Effect<C, I> {
    /// Creates an effect. `canvas = None` makes it permanently inert.
    pub fn new(profile: Profile, canvas: Option<C>, input: I, seed: u64) -> Self {
        if canvas.is_none() {
            tracing::warn!(effect = %profile.name, "drawing context unavailable, effect is inert");
        }

        Self {
            surface: SurfaceManager::new(canvas, profile.dpr_cap),
            store: ParticleStore::new(seed),
            fade: VisibilityFade::new(profile.idle.gate, profile.idle.fade_rate),
            scheduler: FrameScheduler::new(profile.frame_interval_ms),
            cursor: InputCursor::at(&input.snapshot(0.0)),
            input,
            ticks: 0,
            stats: EffectStats::default(),
            torn_down: false,
            profile,
        }
    }

    /// True if there is nothing to draw on.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        !self.surface.is_available()
    }

    /// True once `teardown` ran.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Resizes the surface and reseeds the store.
    ///
    /// Spawn-on-demand effects resolve to zero records, so a resize clears
    /// them.
    pub fn resize(&mut self, viewport: Viewport) -> Option<SurfaceSize> {
        if self.torn_down {
            return None;
        }
        let size = self.surface.resize(viewport)?;
        let count = self.profile.count.resolve(size.css_width, size.css_height);
        self.store.reseed(count, &self.profile, size.bounds());
        Some(size)
    }

    /// Starts the frame loop.
    pub fn start(&mut self, host: &mut impl FrameHost) {
        if self.is_inert() || self.torn_down {
            return;
        }
        self.scheduler.start(host);
        tracing::debug!(
            effect = %self.profile.name,
            interval_ms = self.profile.frame_interval_ms,
            "frame loop started"
        );
    }

    /// Handles a host frame callback; runs a tick when the cap allows.
    pub fn on_frame(&mut self, now_ms: f64, host: &mut impl FrameHost) -> FrameDecision {
        if self.is_inert() {
            return FrameDecision::Stopped;
        }
        let decision = self.scheduler.on_frame(now_ms, host);
        self.stats.callbacks = self.scheduler.callbacks();
        self.stats.dropped_frames = self.scheduler.skipped();

        if decision == FrameDecision::Run {
            self.tick(now_ms);
        }
        decision
    }

    /// Runs Update+Render once, ignoring the frame cap.
    ///
    /// Returns `None` for inert or torn-down effects.
    pub fn tick(&mut self, now_ms: f64) -> Option<TickReport> {
        if self.is_inert() || self.torn_down {
            return None;
        }
        let started = Instant::now();

        // === PHASE 1: Input ===
        let snapshot = self.input.snapshot(now_ms);
        let opacity = self.fade.update(snapshot.idle);
        let suspended = self.profile.idle.suspend_when_hidden && self.fade.is_hidden();
        let ctx = TickContext {
            time_ms: now_ms,
            tick: self.ticks,
            bounds: self.surface.size().bounds(),
            input: &snapshot,
        };

        // === PHASE 2: Update ===
        let mut spawned = 0;
        if !suspended {
            spawned = self.spawn_from_input(&snapshot);
            motion::advance(&mut self.store, &self.profile, &ctx);
        }
        let pruned = self.store.prune();

        // === PHASE 3: Render ===
        let draw = match self.surface.canvas_mut() {
            Some(canvas) => render::paint(canvas, &self.store, &self.profile, &ctx, opacity),
            None => DrawStats::default(),
        };

        self.ticks += 1;
        let report = TickReport {
            tick: self.ticks,
            records: self.store.len(),
            spawned,
            pruned,
            draw,
            opacity,
            suspended,
            elapsed_us: u32::try_from(started.elapsed().as_micros()).unwrap_or(u32::MAX),
        };
        self.stats.record_tick(&report);

        tracing::trace!(
            effect = %self.profile.name,
            tick = report.tick,
            records = report.records,
            draw_calls = report.draw.draw_calls,
            "tick"
        );
        Some(report)
    }

    /// Emits records for new input, per the profile's spawn rule.
    fn spawn_from_input(&mut self, snapshot: &InputSnapshot) -> usize {
        let Some(rule) = self.profile.spawn else {
            return 0;
        };

        match rule.trigger {
            SpawnTrigger::PointerMoving => match snapshot.pointer {
                Some(p) if snapshot.pointer_moving && p.x > 0.0 && p.y > 0.0 => {
                    self.store.spawn(p, rule.batch, &self.profile)
                }
                _ => 0,
            },
            SpawnTrigger::PointerSpeed { min_speed } => {
                let mut spawned = 0;
                for m in snapshot.moves_after(self.cursor.move_serial) {
                    if m.speed > min_speed {
                        spawned += self.store.spawn_with_speed(
                            m.position,
                            rule.batch,
                            &self.profile,
                            Some(m.speed),
                        );
                    }
                }
                self.cursor.move_serial = self.cursor.move_serial.max(snapshot.move_serial);
                spawned
            }
            SpawnTrigger::Click => {
                let mut spawned = 0;
                for click in snapshot.clicks_after(self.cursor.click_serial) {
                    spawned += self.store.spawn(click.position, rule.batch, &self.profile);
                }
                self.cursor.click_serial = self.cursor.click_serial.max(snapshot.last_click_serial());
                spawned
            }
        }
    }

    /// Cancels the frame loop, detaches input and releases the canvas.
    /// Idempotent.
    pub fn teardown(&mut self, host: &mut impl FrameHost) {
        if self.torn_down {
            return;
        }
        self.scheduler.cancel(host);
        self.input.detach();
        self.store.clear();
        if let Some(canvas) = self.surface.canvas_mut() {
            canvas.release();
        }
        self.torn_down = true;

        tracing::info!(
            effect = %self.profile.name,
            ticks = self.stats.ticks,
            dropped = self.stats.dropped_frames,
            "effect torn down"
        );
    }

    /// Profile in force.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Record store.
    #[must_use]
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Surface manager.
    #[must_use]
    pub fn surface(&self) -> &SurfaceManager<C> {
        &self.surface
    }

    /// Canvas, if any.
    #[must_use]
    pub fn canvas(&self) -> Option<&C> {
        self.surface.canvas()
    }

    /// Canvas, mutably, if any.
    pub fn canvas_mut(&mut self) -> Option<&mut C> {
        self.surface.canvas_mut()
    }

    /// Frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Input provider.
    #[must_use]
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Input provider, mutably.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Current idle-fade opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.fade.opacity()
    }

    /// Running totals.
    #[must_use]
    pub fn stats(&self) -> EffectStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::presets::Preset;
    use crate::scheduler::ManualFrameHost;
    use echoes_input::{PointerMove, StaticInput};
    use echoes_shared::Vec2;

    fn effect(preset: Preset) -> Effect<RecordingCanvas, StaticInput> {
        Effect::new(
            preset.profile(),
            Some(RecordingCanvas::new()),
            StaticInput::new(InputSnapshot::default()),
            42,
        )
    }

    #[test]
    fn test_resize_reseeds() {
        let mut fx = effect(Preset::Vortex);
        let size = fx.resize(Viewport::new(800.0, 600.0, 2.0));
        assert_eq!(size.map(|s| s.scale), Some(1.5));
        assert_eq!(fx.store().len(), 200);
    }

    #[test]
    fn test_inert_effect_is_noop() {
        let mut fx: Effect<RecordingCanvas, StaticInput> = Effect::new(
            Preset::Aurora.profile(),
            None,
            StaticInput::new(InputSnapshot::default()),
            1,
        );
        let mut host = ManualFrameHost::new();

        assert!(fx.is_inert());
        assert!(fx.resize(Viewport::new(800.0, 600.0, 1.0)).is_none());
        fx.start(&mut host);
        assert_eq!(fx.on_frame(0.0, &mut host), FrameDecision::Stopped);
        assert!(fx.tick(0.0).is_none());
        assert_eq!(host.requested, 0);
        fx.teardown(&mut host);
        assert!(!fx.input().is_attached());
    }

    #[test]
    fn test_click_spawns_once() {
        let mut fx = effect(Preset::ClickRipples);
        fx.resize(Viewport::new(800.0, 600.0, 1.0));

        let mut snapshot = InputSnapshot::at(Vec2::new(100.0, 100.0));
        snapshot.clicks.push(echoes_input::Click {
            serial: 1,
            position: Vec2::new(100.0, 100.0),
        });
        fx.input_mut().snapshot = snapshot;

        assert_eq!(fx.tick(0.0).map(|r| r.spawned), Some(1));
        assert_eq!(fx.tick(42.0).map(|r| r.spawned), Some(0));
        assert_eq!(fx.store().len(), 1);
    }

    fn moved(snapshot: &mut InputSnapshot, x: f32, speed: f32) {
        snapshot.move_serial += 1;
        snapshot.pointer = Some(Vec2::new(x, 300.0));
        snapshot.pointer_speed = speed;
        snapshot.pointer_moving = true;
        snapshot.moves.push(PointerMove {
            serial: snapshot.move_serial,
            position: Vec2::new(x, 300.0),
            speed,
        });
    }

    #[test]
    fn test_fast_move_spawns_ripple() {
        let mut fx = effect(Preset::FluidLines);
        fx.resize(Viewport::new(800.0, 600.0, 1.0));

        let mut snapshot = InputSnapshot::default();
        moved(&mut snapshot, 300.0, 12.0);
        fx.input_mut().snapshot = snapshot.clone();
        assert_eq!(fx.tick(0.0).map(|r| r.spawned), Some(1));

        let strength = fx.store().points().next().map(|p| p.strength);
        assert_eq!(strength, Some(6.0));

        // Same move event: no new ripple.
        assert_eq!(fx.tick(42.0).map(|r| r.spawned), Some(0));

        // Slow move: no ripple.
        moved(&mut snapshot, 303.0, 3.0);
        fx.input_mut().snapshot = snapshot;
        assert_eq!(fx.tick(84.0).map(|r| r.spawned), Some(0));
    }

    #[test]
    fn test_every_fast_move_between_ticks_spawns() {
        let mut fx = effect(Preset::FluidLines);
        fx.resize(Viewport::new(800.0, 600.0, 1.0));

        // Five moves land between two ticks; one of them is slow.
        let mut snapshot = InputSnapshot::default();
        for (x, speed) in [(100.0, 20.0), (130.0, 30.0), (132.0, 2.0), (180.0, 48.0), (250.0, 70.0)] {
            moved(&mut snapshot, x, speed);
        }
        fx.input_mut().snapshot = snapshot;

        assert_eq!(fx.tick(0.0).map(|r| r.spawned), Some(4));
        let ripples: Vec<(f32, f32)> = fx.store().points().map(|p| (p.position.x, p.strength)).collect();
        assert_eq!(ripples, vec![(100.0, 10.0), (130.0, 15.0), (180.0, 24.0), (250.0, 30.0)]);
        assert_eq!(fx.tick(42.0).map(|r| r.spawned), Some(0));
    }

    #[test]
    fn test_hidden_aurora_is_suspended() {
        let mut fx = effect(Preset::Aurora);
        fx.resize(Viewport::new(800.0, 600.0, 1.0));
        let before: Vec<Vec2> = fx.store().points().map(|p| p.position).collect();

        let report = fx.tick(0.0);
        assert_eq!(report.map(|r| r.suspended), Some(true));
        let after: Vec<Vec2> = fx.store().points().map(|p| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut fx = effect(Preset::Vortex);
        let mut host = ManualFrameHost::new();
        fx.resize(Viewport::new(800.0, 600.0, 1.0));
        fx.start(&mut host);
        fx.on_frame(0.0, &mut host);

        fx.teardown(&mut host);
        fx.teardown(&mut host);

        assert_eq!(host.cancelled, 1);
        assert!(host.outstanding().is_none());
        assert!(!fx.input().is_attached());
        assert!(fx.canvas().is_some_and(RecordingCanvas::is_released));
        assert!(fx.tick(100.0).is_none());
        assert_eq!(fx.on_frame(100.0, &mut host), FrameDecision::Stopped);
    }
}
