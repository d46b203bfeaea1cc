//! # Drawing Surface Abstraction
//!
//! The render stage talks to a [`Canvas`], never to the browser directly.
//! The web host implements it on top of a 2D context; tests and the headless
//! simulator use [`RecordingCanvas`], which stores every call as a
//! [`DrawCommand`].
//!
//! ```text
//!   render::paint ──► Canvas ──┬─► Canvas2d (browser, echoes_web)
//!                              └─► RecordingCanvas (tests, echoes_sim)
//! ```
//!
//! All coordinates are CSS pixels. The host applies the device-pixel scale
//! once per resize through [`Canvas::set_scale`].

use serde::{Deserialize, Serialize};

use echoes_shared::{GradientStop, Hsla, Rgba, Vec2};

/// Compositing mode for subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Normal alpha compositing. Used for the trail overpaint.
    #[default]
    SourceOver,
    /// Screen: brightens, never darkens.
    Screen,
    /// Additive: overlapping glows add up (blob bridges).
    Lighter,
}

impl BlendMode {
    /// Name as understood by `globalCompositeOperation` / `mix-blend-mode`.
    #[must_use]
    pub const fn css_name(&self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::Screen => "screen",
            Self::Lighter => "lighter",
        }
    }

    /// Name for the CSS `mix-blend-mode` property (which has no `lighter`).
    #[must_use]
    pub const fn mix_blend_name(&self) -> &'static str {
        match self {
            Self::SourceOver => "normal",
            Self::Screen => "screen",
            Self::Lighter => "plus-lighter",
        }
    }
}

/// Minimal 2D drawing interface used by the render stage.
pub trait Canvas {
    /// Resizes the backing store to `width` x `height` device pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Sets the CSS-to-device transform (replaces, never accumulates).
    fn set_scale(&mut self, scale: f32);

    /// Clears a CSS-pixel rectangle at the origin to transparent.
    fn clear(&mut self, width: f32, height: f32);

    /// Fills a rectangle at the origin with a flat colour.
    fn fill_rect(&mut self, width: f32, height: f32, color: Rgba);

    /// Sets the compositing mode.
    fn set_blend(&mut self, mode: BlendMode);

    /// Fills a circle with a radial gradient from its centre.
    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    /// Fills a circle with a flat colour.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla);

    /// Strokes an open polyline.
    fn stroke_path(&mut self, points: &[Vec2], color: Hsla, width: f32);

    /// Strokes a single segment.
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32);

    /// Fills a closed polygon with a vertical linear gradient running from
    /// `top` to `bottom`.
    fn fill_linear(&mut self, points: &[Vec2], top: f32, bottom: f32, stops: &[GradientStop]);

    /// Blurs subsequent draws by `radius` CSS pixels (0 turns it off).
    fn set_blur(&mut self, radius: f32);

    /// Takes the surface off the page. Called once, on teardown.
    fn release(&mut self) {}
}

/// A recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Backing store resized.
    Resize {
        /// Device pixels.
        width: u32,
        /// Device pixels.
        height: u32,
    },
    /// Transform set.
    Scale(f32),
    /// Rectangle cleared.
    Clear {
        /// CSS pixels.
        width: f32,
        /// CSS pixels.
        height: f32,
    },
    /// Flat rectangle fill.
    FillRect {
        /// CSS pixels.
        width: f32,
        /// CSS pixels.
        height: f32,
        /// Fill colour.
        color: Rgba,
    },
    /// Compositing mode changed.
    Blend(BlendMode),
    /// Radial gradient fill.
    Radial {
        /// Centre.
        center: Vec2,
        /// Outer radius.
        radius: f32,
        /// Gradient stops.
        stops: Vec<GradientStop>,
    },
    /// Flat circle fill.
    Circle {
        /// Centre.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill colour.
        color: Hsla,
    },
    /// Polyline stroke.
    Path {
        /// Vertices.
        points: Vec<Vec2>,
        /// Stroke colour.
        color: Hsla,
        /// Line width.
        width: f32,
    },
    /// Polygon filled with a vertical linear gradient.
    Linear {
        /// Polygon vertices.
        points: Vec<Vec2>,
        /// Gradient start (y).
        top: f32,
        /// Gradient end (y).
        bottom: f32,
        /// Gradient stops.
        stops: Vec<GradientStop>,
    },
    /// Blur radius changed.
    Blur(f32),
    /// Surface taken off the page.
    Released,
    /// Segment stroke.
    Segment {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke colour.
        color: Hsla,
        /// Line width.
        width: f32,
    },
}

impl DrawCommand {
    /// True for commands that wipe or overpaint the whole surface.
    #[must_use]
    pub fn is_frame_start(&self) -> bool {
        matches!(self, Self::Clear { .. } | Self::FillRect { .. })
    }
}

/// Canvas that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    /// Recorded calls, oldest first.
    commands: Vec<DrawCommand>,
    /// Current backing-store size.
    pixel_size: (u32, u32),
    /// Current transform scale.
    scale: f32,
    /// Current blend mode.
    blend: BlendMode,
    /// Current blur radius.
    blur: f32,
    /// Set by `release`.
    released: bool,
}

impl RecordingCanvas {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
            pixel_size: (0, 0),
            scale: 1.0,
            blend: BlendMode::SourceOver,
            blur: 0.0,
            released: false,
        }
    }

    /// Recorded calls.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded calls, leaving the log empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded frames (surface wipes/overpaints).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_frame_start()).count()
    }

    /// Backing-store size in device pixels.
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }

    /// Current transform scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current blend mode.
    #[must_use]
    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    /// Current blur radius.
    #[must_use]
    pub fn blur(&self) -> f32 {
        self.blur
    }

    /// True once the surface was released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Canvas for RecordingCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        self.pixel_size = (width, height);
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.commands.push(DrawCommand::Scale(scale));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, width: f32, height: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { width, height, color });
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.commands.push(DrawCommand::Blend(mode));
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::Radial {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn stroke_path(&mut self, points: &[Vec2], color: Hsla, width: f32) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32) {
        self.commands.push(DrawCommand::Segment { from, to, color, width });
    }

    fn fill_linear(&mut self, points: &[Vec2], top: f32, bottom: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::Linear {
            points: points.to_vec(),
            top,
            bottom,
            stops: stops.to_vec(),
        });
    }

    fn set_blur(&mut self, radius: f32) {
        self.blur = radius;
        self.commands.push(DrawCommand::Blur(radius));
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.commands.push(DrawCommand::Released);
        }
    }
}
