//! Mathematical types shared by every effect.
//!
//! All coordinates are CSS pixels. The surface manager owns the mapping to
//! device pixels, so nothing in here knows about the device pixel ratio.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 2D Vector - positions, velocities, orbit radii
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from polar coordinates.
    #[must_use]
    pub fn from_polar(angle: f32, radius: f32) -> Self {
        Self::new(angle.cos() * radius, angle.sin() * radius)
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Midpoint between two points
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        (self + other) * 0.5
    }

    /// Moves `self` a fraction of the way toward `target`.
    ///
    /// This is the exponential smoothing step used by pursuit motion:
    /// `pos += (target - pos) * factor`.
    #[must_use]
    pub fn ease_toward(self, target: Self, factor: f32) -> Self {
        self + (target - self) * factor
    }

    /// True if the point lies in `[0, width) x [0, height)`.
    #[must_use]
    pub fn within(self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.x < width && self.y >= 0.0 && self.y < height
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// Inclusive numeric range used by profiles (`size`, `speed`, `opacity`...).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl Span {
    /// Creates a new span
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A span holding a single value
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// True if both bounds are finite and ordered.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// True if `value` lies inside the span (inclusive).
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps `value` into the span.
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Scales both bounds.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }

    /// Draws a uniform sample from the span.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// Proximity influence in `[0, 1]`: `max(0, 1 - distance / threshold)`.
///
/// A non-positive threshold means "no influence".
#[must_use]
pub fn influence(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / threshold).max(0.0)
}

/// Breathing term in `[0, 1]`: `(sin(time * speed + offset) + 1) / 2`.
#[must_use]
pub fn pulse(time: f32, speed: f32, offset: f32) -> f32 {
    ((time * speed + offset).sin() + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec2::new(5.0, 8.0));
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), Vec2::new(2.5, 4.0));
    }

    #[test]
    fn test_ease_toward_moves_fraction() {
        let eased = Vec2::ZERO.ease_toward(Vec2::new(100.0, 0.0), 0.02);
        assert!((eased.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_influence_clamps_to_zero() {
        assert_eq!(influence(0.0, 200.0), 1.0);
        assert_eq!(influence(100.0, 200.0), 0.5);
        assert_eq!(influence(400.0, 200.0), 0.0);
        assert_eq!(influence(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_pulse_range() {
        for i in 0..1000 {
            let p = pulse(i as f32 * 3.7, 0.02, 1.3);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_span_sample_inside() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let span = Span::new(1.0, 4.0);
        for _ in 0..500 {
            assert!(span.contains(span.sample(&mut rng)));
        }
        assert_eq!(Span::fixed(2.0).sample(&mut rng), 2.0);
    }
}
