//! # Surface Manager
//!
//! Owns the drawing surface and keeps its backing store in step with the
//! viewport. The backing store is `css size * min(device pixel ratio, cap)`
//! and the drawing transform is reset (not multiplied) on every resize.
//!
//! If the host could not supply a drawing context the manager is *inert*:
//! every operation is a no-op and [`SurfaceManager::resize`] reports `None`.

use echoes_shared::Vec2;

use crate::canvas::Canvas;

/// Viewport dimensions reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// CSS pixels.
    pub width: f32,
    /// CSS pixels.
    pub height: f32,
    /// `window.devicePixelRatio`.
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Resolved surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    /// CSS width.
    pub css_width: f32,
    /// CSS height.
    pub css_height: f32,
    /// Backing-store width (device pixels).
    pub pixel_width: u32,
    /// Backing-store height (device pixels).
    pub pixel_height: u32,
    /// Applied CSS-to-device scale.
    pub scale: f32,
}

impl SurfaceSize {
    /// Computes the surface size for a viewport under a DPR cap.
    ///
    /// Non-finite or non-positive inputs collapse to an empty surface with
    /// scale 1.
    #[must_use]
    pub fn for_viewport(viewport: Viewport, dpr_cap: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let css_width = sanitize(viewport.width);
        let css_height = sanitize(viewport.height);

        let dpr = if viewport.device_pixel_ratio.is_finite() && viewport.device_pixel_ratio > 0.0 {
            viewport.device_pixel_ratio
        } else {
            1.0
        };
        let scale = if dpr_cap > 0.0 { dpr.min(dpr_cap) } else { dpr };

        Self {
            css_width,
            css_height,
            pixel_width: (css_width * scale).floor() as u32,
            pixel_height: (css_height * scale).floor() as u32,
            scale,
        }
    }

    /// Size as a vector (CSS pixels).
    #[must_use]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.css_width, self.css_height)
    }

    /// True if there is nothing to draw on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.css_width <= 0.0 || self.css_height <= 0.0
    }
}

/// Owns an optional canvas and its current size.
#[derive(Debug)]
pub struct SurfaceManager<C> {
    /// `None` when the host had no drawing context.
    canvas: Option<C>,
    /// Last applied size.
    size: SurfaceSize,
    /// Device-pixel-ratio cap.
    dpr_cap: f32,
}

impl<C: Canvas> SurfaceManager<C> {
    /// Creates a manager. `canvas = None` yields an inert surface.
    #[must_use]
    pub fn new(canvas: Option<C>, dpr_cap: f32) -> Self {
        Self {
            canvas,
            size: SurfaceSize::default(),
            dpr_cap,
        }
    }

    /// True if a drawing context is present.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.canvas.is_some()
    }

    /// Resizes the backing store and resets the transform.
    ///
    /// Returns the new size, or `None` when inert.
    pub fn resize(&mut self, viewport: Viewport) -> Option<SurfaceSize> {
        let canvas = self.canvas.as_mut()?;
        let size = SurfaceSize::for_viewport(viewport, self.dpr_cap);

        canvas.resize(size.pixel_width, size.pixel_height);
        canvas.set_scale(size.scale);
        self.size = size;

        tracing::debug!(
            css_width = size.css_width,
            css_height = size.css_height,
            pixel_width = size.pixel_width,
            pixel_height = size.pixel_height,
            scale = size.scale,
            "surface resized"
        );
        Some(size)
    }

    /// Last applied size.
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// DPR cap in force.
    #[must_use]
    pub fn dpr_cap(&self) -> f32 {
        self.dpr_cap
    }

    /// The canvas, if any.
    #[must_use]
    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    /// The canvas, mutably, if any.
    pub fn canvas_mut(&mut self) -> Option<&mut C> {
        self.canvas.as_mut()
    }

    /// Gives the canvas back to the host. The manager becomes inert.
    pub fn release(&mut self) -> Option<C> {
        self.canvas.take()
    }
}
