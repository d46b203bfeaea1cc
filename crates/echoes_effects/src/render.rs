//! # Render Stage
//!
//! Reads the store and paints one frame:
//!
//! 1. persistence: full clear, or a low-alpha overpaint that leaves trails
//! 2. records, per the profile's [`RenderPrimitive`]
//! 3. proximity links, if the profile has them
//!
//! The idle fade multiplies every alpha. A fully faded layer is still
//! cleared so nothing stale lingers on screen.

use echoes_shared::constants::VISIBILITY_EPSILON;
use echoes_shared::{influence, mix_hue, GradientStop, Hsla, Rgba, Vec2};

use crate::canvas::{BlendMode, Canvas};
use crate::motion::{wave_offset, Ripple, TickContext};
use crate::profile::{
    BlobStyle, GlowStyle, LinkStyle, Profile, RenderPrimitive, RingStyle, ScrollBandStyle,
    SpotlightStyle, StopStyle, TrailMode, WaveBandStyle, WaveStyle,
};
use crate::record::{FieldBlob, PointParticle};
use crate::stats::DrawStats;
use crate::store::ParticleStore;

/// Canvas wrapper that counts calls.
struct Painter<'c, C> {
    canvas: &'c mut C,
    stats: DrawStats,
}

impl<C: Canvas> Painter<'_, C> {
    fn clear(&mut self, bounds: Vec2) {
        self.canvas.clear(bounds.x, bounds.y);
        self.stats.draw_calls += 1;
    }

    fn fill_rect(&mut self, bounds: Vec2, color: Rgba) {
        self.canvas.fill_rect(bounds.x, bounds.y, color);
        self.stats.draw_calls += 1;
    }

    fn blend(&mut self, mode: BlendMode) {
        self.canvas.set_blend(mode);
    }

    fn radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.canvas.fill_radial(center, radius, stops);
        self.stats.draw_calls += 1;
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Hsla) {
        self.canvas.fill_circle(center, radius, color);
        self.stats.draw_calls += 1;
    }

    fn path(&mut self, points: &[Vec2], color: Hsla, width: f32) {
        self.canvas.stroke_path(points, color, width);
        self.stats.draw_calls += 1;
    }

    fn linear(&mut self, points: &[Vec2], top: f32, bottom: f32, stops: &[GradientStop]) {
        self.canvas.fill_linear(points, top, bottom, stops);
        self.stats.draw_calls += 1;
    }

    fn blur(&mut self, radius: f32) {
        self.canvas.set_blur(radius);
    }

    fn segment(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32) {
        self.canvas.stroke_segment(from, to, color, width);
        self.stats.draw_calls += 1;
        self.stats.links += 1;
    }
}

/// Paints one frame. `fade` is the idle-fade opacity in `[0, 1]`.
pub fn paint<C: Canvas>(
    canvas: &mut C,
    store: &ParticleStore,
    profile: &Profile,
    ctx: &TickContext<'_>,
    fade: f32,
) -> DrawStats {
    let mut painter = Painter {
        canvas,
        stats: DrawStats::default(),
    };

    match profile.trail {
        TrailMode::Clear => painter.clear(ctx.bounds),
        TrailMode::Fade { color, alpha } => {
            painter.blend(BlendMode::SourceOver);
            painter.fill_rect(ctx.bounds, color.with_alpha(alpha));
        }
    }

    let fade = fade.clamp(0.0, 1.0);
    if fade <= VISIBILITY_EPSILON {
        return painter.stats;
    }

    painter.blend(profile.blend);
    match &profile.primitive {
        RenderPrimitive::Glow(style) => {
            for p in store.points().filter(|p| p.is_alive()) {
                draw_glow(&mut painter, p, style, fade);
            }
        }
        RenderPrimitive::Blob(style) => {
            let blobs: Vec<&FieldBlob> = store.blobs().collect();
            draw_blobs(&mut painter, &blobs, style, profile.blend, fade);
        }
        RenderPrimitive::WaveLines(style) => draw_waves(&mut painter, store, style, ctx, fade),
        RenderPrimitive::Ring(style) => {
            for p in store.points().filter(|p| p.is_alive()) {
                draw_ring(&mut painter, p, style, fade);
            }
        }
        RenderPrimitive::Spotlight(style) => draw_spotlight(&mut painter, store, style, ctx, fade),
        RenderPrimitive::ScrollBands(style) => draw_scroll_bands(&mut painter, style, ctx, fade),
    }

    if let Some(links) = &profile.links {
        let points: Vec<&PointParticle> = store.points().filter(|p| p.is_alive()).collect();
        draw_links(&mut painter, &points, links, fade);
    }

    painter.stats
}

fn gradient(stops: [StopStyle; 3], hue: f32, alpha: f32) -> [GradientStop; 3] {
    stops.map(|s| GradientStop::new(s.offset, Hsla::new(hue, s.saturation, s.lightness, alpha * s.alpha)))
}

fn draw_glow<C: Canvas>(painter: &mut Painter<'_, C>, p: &PointParticle, style: &GlowStyle, fade: f32) {
    let alpha = p.current_opacity * fade;
    if alpha <= 0.0 || p.current_size <= 0.0 {
        return;
    }

    let stops = gradient(style.stops, p.hue, alpha);
    painter.radial(p.position, p.current_size * style.radius_scale, &stops);
    if let Some(core) = style.core {
        painter.circle(
            p.position,
            p.current_size * core.radius_scale,
            Hsla::new(p.hue, core.saturation, core.lightness, alpha),
        );
    }
    painter.stats.records_drawn += 1;
}

fn draw_blobs<C: Canvas>(
    painter: &mut Painter<'_, C>,
    blobs: &[&FieldBlob],
    style: &BlobStyle,
    blend: BlendMode,
    fade: f32,
) {
    for blob in blobs {
        if blob.radius <= 0.0 {
            continue;
        }
        let stops = gradient(style.stops, blob.hue, fade);
        painter.radial(blob.position, blob.radius, &stops);
        painter.stats.records_drawn += 1;
    }

    if !style.bridges {
        return;
    }

    painter.blend(style.bridge_blend);
    for (i, a) in blobs.iter().enumerate() {
        for b in &blobs[i + 1..] {
            let reach = a.radius + b.radius;
            let distance = a.position.distance(b.position);
            if reach <= 0.0 || distance >= reach {
                continue;
            }
            let radius = distance * 0.5;
            if radius <= 0.0 {
                continue;
            }
            let alpha = influence(distance, reach) * style.bridge_alpha * fade;
            let hue = mix_hue(a.hue, b.hue);
            let stops = [
                GradientStop::new(0.0, Hsla::new(hue, 70.0, 50.0, alpha)),
                GradientStop::new(1.0, Hsla::transparent(hue)),
            ];
            painter.radial(a.position.midpoint(b.position), radius, &stops);
        }
    }
    painter.blend(blend);
}

fn draw_ring<C: Canvas>(painter: &mut Painter<'_, C>, p: &PointParticle, style: &RingStyle, fade: f32) {
    let alpha = p.current_opacity * fade;
    if p.ring_radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    let stops = gradient(style.stops, p.hue, alpha);
    painter.radial(p.position, p.ring_radius, &stops);
    painter.stats.records_drawn += 1;
}

fn draw_waves<C: Canvas>(
    painter: &mut Painter<'_, C>,
    store: &ParticleStore,
    style: &WaveStyle,
    ctx: &TickContext<'_>,
    fade: f32,
) {
    let (width, height) = (ctx.bounds.x, ctx.bounds.y);
    if width <= 0.0 || height <= 0.0 || style.step <= 0.0 {
        return;
    }

    let phase = ctx.tick as f32 * style.time_rate;
    let ripples = Ripple::collect(store);
    let pointer = ctx.input.pointer;
    let scroll = ctx.input.scroll_velocity;

    let samples = (width / style.step) as usize + 1;
    let mut points = Vec::with_capacity(samples);

    for line in 0..style.lines {
        let progress = line as f32 / style.lines as f32;
        let base_y = height * progress;

        points.clear();
        for s in 0..samples {
            let x = s as f32 * style.step;
            let y = base_y + wave_offset(x, base_y, progress, phase, pointer, &ripples, style);
            points.push(Vec2::new(x, y));
        }

        let alpha = (style.alpha_base + progress * style.alpha_gain + scroll * style.scroll_alpha) * fade;
        let color = Hsla::new(
            style.hue_start + progress * style.hue_span,
            style.saturation,
            style.lightness,
            alpha,
        );
        painter.path(&points, color, style.width);
    }
}

fn draw_spotlight<C: Canvas>(
    painter: &mut Painter<'_, C>,
    store: &ParticleStore,
    style: &SpotlightStyle,
    ctx: &TickContext<'_>,
    fade: f32,
) {
    let lights: Vec<&PointParticle> = store.points().filter(|p| p.is_alive()).collect();

    if let Some(band) = &style.band {
        draw_wave_band(painter, band, lights.first().map(|p| p.position.x), ctx, fade);
    }

    for p in lights {
        let alpha = p.current_opacity * fade;
        if alpha <= 0.0 {
            continue;
        }
        let stops = style
            .stops
            .map(|s| GradientStop::new(s.offset, s.color.with_alpha(s.color.a * alpha)));
        painter.radial(p.position, style.radius, &stops);
        painter.stats.records_drawn += 1;
    }
}

/// Fills the area under a wave whose bump follows `light_x`.
fn draw_wave_band<C: Canvas>(
    painter: &mut Painter<'_, C>,
    band: &WaveBandStyle,
    light_x: Option<f32>,
    ctx: &TickContext<'_>,
    fade: f32,
) {
    let (width, height) = (ctx.bounds.x, ctx.bounds.y);
    if width <= 0.0 || height <= 0.0 || band.step <= 0.0 {
        return;
    }

    let t = ctx.time() * band.time_rate;
    let base_y = height * band.baseline;
    let samples = (width / band.step) as usize + 1;
    let mut points = Vec::with_capacity(samples + 3);
    points.push(Vec2::new(0.0, base_y));

    for s in 0..samples {
        let x = s as f32 * band.step;
        let bump = light_x.map_or(0.0, |lx| {
            let reach = (x - lx).abs() / width * band.pointer_reach;
            (1.0 - reach).max(0.0) * band.pointer_amplitude
        });
        let y = base_y
            + (x * band.frequency[0] + t).sin() * band.amplitude[0]
            + (x * band.frequency[1] - t * band.drift).sin() * band.amplitude[1]
            + bump * (t * band.pointer_rate).sin();
        points.push(Vec2::new(x, y));
    }
    points.push(Vec2::new(width, height));
    points.push(Vec2::new(0.0, height));

    let stops = [
        GradientStop::new(0.0, band.color.with_alpha(band.color.a * fade)),
        GradientStop::new(1.0, Hsla::transparent(band.color.h)),
    ];
    painter.linear(&points, height * band.gradient_top, height, &stops);
}

fn draw_scroll_bands<C: Canvas>(
    painter: &mut Painter<'_, C>,
    style: &ScrollBandStyle,
    ctx: &TickContext<'_>,
    fade: f32,
) {
    let (width, height) = (ctx.bounds.x, ctx.bounds.y);
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let velocity = ctx.input.scroll_velocity;
    let progress = (ctx.input.scroll_y / style.scroll_range).clamp(0.0, 1.0);

    for band in &style.bands {
        let alpha = (band.opacity + velocity * band.opacity_gain).clamp(0.0, 1.0) * fade;
        if alpha <= 0.0 {
            continue;
        }
        let top = height * band.anchor + band.shift * progress;
        let bottom = top + band.height;
        let rect = [
            Vec2::new(0.0, top),
            Vec2::new(width, top),
            Vec2::new(width, bottom),
            Vec2::new(0.0, bottom),
        ];
        let stops = [
            GradientStop::new(0.0, Hsla::transparent(band.color.h)),
            GradientStop::new(0.5, band.color.with_alpha(alpha)),
            GradientStop::new(1.0, Hsla::transparent(band.color.h)),
        ];

        painter.blur((band.blur - velocity * band.blur_gain).max(0.0));
        painter.linear(&rect, top, bottom, &stops);
        painter.stats.records_drawn += 1;
    }
    painter.blur(0.0);
}

fn draw_links<C: Canvas>(
    painter: &mut Painter<'_, C>,
    points: &[&PointParticle],
    style: &LinkStyle,
    fade: f32,
) {
    for (i, a) in points.iter().enumerate() {
        let end = (i + 1 + style.window).min(points.len());
        for b in &points[i + 1..end] {
            let strength = influence(a.position.distance(b.position), style.threshold);
            if strength <= 0.0 {
                continue;
            }
            let alpha = strength * style.alpha * a.shimmer * fade;
            let color = Hsla::new(mix_hue(a.hue, b.hue), style.saturation, style.lightness, alpha);
            painter.segment(a.position, b.position, color, style.width);
        }
    }
}
