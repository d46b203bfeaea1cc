//! Colour types.
//!
//! Effects think in HSL hues (the palette is a handful of hues), so the
//! canonical colour is [`Hsla`]. [`Rgba`] only exists for the trail-fade
//! overpaint, which paints the page background colour.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hue / saturation / lightness / alpha colour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    /// Hue in degrees.
    pub h: f32,
    /// Saturation in percent (0-100).
    pub s: f32,
    /// Lightness in percent (0-100).
    pub l: f32,
    /// Alpha (0-1).
    pub a: f32,
}

impl Hsla {
    /// Creates a new colour. Alpha is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a: a.clamp(0.0, 1.0) }
    }

    /// Fully transparent colour with the given hue.
    #[must_use]
    pub fn transparent(h: f32) -> Self {
        Self::new(h, 0.0, 0.0, 0.0)
    }

    /// Same colour with another alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.h, self.s, self.l, a)
    }

    /// CSS `hsla(...)` string.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({:.1}, {:.1}%, {:.1}%, {:.4})",
            self.h, self.s, self.l, self.a
        )
    }
}

/// 8-bit RGB colour with float alpha.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha (0-1)
    pub a: f32,
}

impl Rgba {
    /// Page background used by trail overpaint (deep indigo).
    pub const BACKGROUND: Self = Self::new(10, 10, 26, 1.0);

    /// Creates a new colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with another alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS `rgba(...)` string.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.4})", self.r, self.g, self.b, self.a)
    }
}

/// One stop of a radial or linear gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient (0 = centre or top, 1 = edge or bottom).
    pub offset: f32,
    /// Colour at this offset.
    pub color: Hsla,
}

impl GradientStop {
    /// Creates a new stop.
    #[must_use]
    pub const fn new(offset: f32, color: Hsla) -> Self {
        Self { offset, color }
    }
}

/// A small fixed set of hues an effect draws from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<f32>);

impl Palette {
    /// Rose, teal, violet.
    #[must_use]
    pub fn glow() -> Self {
        Self(vec![340.0, 170.0, 270.0])
    }

    /// Returns the number of hues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the palette has no hues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Picks a hue uniformly. An empty palette yields hue 0.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0[rng.gen_range(0..self.0.len())]
    }

    /// Picks hues round-robin (blobs cycle through the palette).
    #[must_use]
    pub fn cycle(&self, index: usize) -> f32 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0[index % self.0.len()]
    }

    /// True if `hue` is one of the palette entries.
    #[must_use]
    pub fn contains(&self, hue: f32) -> bool {
        self.0.iter().any(|&h| (h - hue).abs() < f32::EPSILON)
    }
}

/// Average of two hues, as used for links and blob bridges.
#[must_use]
pub fn mix_hue(a: f32, b: f32) -> f32 {
    (a + b) * 0.5
}
