//! [`Canvas`] over a `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use echoes_effects::{BlendMode, Canvas, EffectError, EffectResult, LayerStyle};
use echoes_shared::{GradientStop, Hsla, Rgba, Vec2};

use crate::style::layer_css;

/// A canvas element appended to the page body plus its 2D context.
pub struct Canvas2d {
    element: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

fn unavailable(what: &str, err: impl std::fmt::Debug) -> EffectError {
    EffectError::ContextUnavailable(format!("{what}: {err:?}"))
}

impl Canvas2d {
    /// Creates the element, styles it for `layer` and acquires a 2D context.
    pub fn attach(document: &Document, layer: &LayerStyle) -> EffectResult<Self> {
        let element: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| unavailable("create canvas", e))?
            .dyn_into()
            .map_err(|e| unavailable("not a canvas", e))?;

        element
            .set_attribute("style", &layer_css(layer))
            .map_err(|e| unavailable("style canvas", e))?;
        element
            .set_attribute("aria-hidden", "true")
            .map_err(|e| unavailable("style canvas", e))?;

        let context: CanvasRenderingContext2d = element
            .get_context("2d")
            .map_err(|e| unavailable("2d context", e))?
            .ok_or_else(|| EffectError::ContextUnavailable("2d context not supported".into()))?
            .dyn_into()
            .map_err(|e| unavailable("2d context", e))?;

        let body = document
            .body()
            .ok_or_else(|| EffectError::ContextUnavailable("document has no body".into()))?;
        body.append_child(&element)
            .map_err(|e| unavailable("append canvas", e))?;

        Ok(Self { element, context })
    }

    fn circle(&self, center: Vec2, radius: f32) {
        self.context.begin_path();
        // Only fails for a negative radius.
        let _ = self.context.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        );
    }
}

impl Canvas for Canvas2d {
    fn resize(&mut self, width: u32, height: u32) {
        self.element.set_width(width);
        self.element.set_height(height);
    }

    fn set_scale(&mut self, scale: f32) {
        let s = f64::from(scale);
        let _ = self.context.set_transform(s, 0.0, 0.0, s, 0.0, 0.0);
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.context
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn fill_rect(&mut self, width: f32, height: f32, color: Rgba) {
        self.context.set_fill_style_str(&color.to_css());
        self.context
            .fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn set_blend(&mut self, mode: BlendMode) {
        let _ = self.context.set_global_composite_operation(mode.css_name());
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 {
            return;
        }
        let (x, y) = (f64::from(center.x), f64::from(center.y));
        let Ok(gradient) = self
            .context
            .create_radial_gradient(x, y, 0.0, x, y, f64::from(radius))
        else {
            return;
        };
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css());
        }
        self.context.set_fill_style_canvas_gradient(&gradient);
        self.circle(center, radius);
        self.context.fill();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla) {
        self.context.set_fill_style_str(&color.to_css());
        self.circle(center, radius);
        self.context.fill();
    }

    fn stroke_path(&mut self, points: &[Vec2], color: Hsla, width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(f64::from(width));
        self.context.begin_path();
        self.context.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            self.context.line_to(f64::from(p.x), f64::from(p.y));
        }
        self.context.stroke();
    }

    fn fill_linear(&mut self, points: &[Vec2], top: f32, bottom: f32, stops: &[GradientStop]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let gradient = self
            .context
            .create_linear_gradient(0.0, f64::from(top), 0.0, f64::from(bottom));
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css());
        }
        self.context.set_fill_style_canvas_gradient(&gradient);
        self.context.begin_path();
        self.context.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            self.context.line_to(f64::from(p.x), f64::from(p.y));
        }
        self.context.close_path();
        self.context.fill();
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, color: Hsla, width: f32) {
        self.stroke_path(&[from, to], color, width);
    }

    fn set_blur(&mut self, radius: f32) {
        if radius > 0.0 {
            self.context.set_filter(&format!("blur({radius}px)"));
        } else {
            self.context.set_filter("none");
        }
    }

    /// Removes the element from the page.
    fn release(&mut self) {
        self.element.remove();
    }
}
