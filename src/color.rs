//! Normalized RGBA color sample used throughout the engine.

use std::fmt;

use crate::color_utils;
use crate::constants::{COLOR_EPSILON, DEFAULT_BACKGROUND_RGB8};

/// An RGBA color with channels normalized to `[0, 1]`.
///
/// Brightness is always derived from the RGB channels (see [`ColorSample::brightness`]),
/// so it can never drift out of sync with the color itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorSample {
    pub const BLACK: ColorSample = ColorSample {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from normalized RGB channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from 8-bit RGB channels.
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// The stock background color.
    pub fn default_background() -> Self {
        Self::from_rgb8(DEFAULT_BACKGROUND_RGB8)
    }

    /// Quantize back to 8-bit RGB, clamping out-of-range channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// V channel of the HSV decomposition.
    pub fn brightness(&self) -> f32 {
        color_utils::brightness(*self)
    }

    /// Per-channel linear interpolation. `t` is not clamped.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }

    /// Tolerant equality used when deciding whether a target actually moved.
    ///
    /// Two samples are considered equal when the squared distance between them
    /// (over all four channels) is below `COLOR_EPSILON²`.
    pub fn approx_eq(&self, other: &Self) -> bool {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        let da = self.a - other.a;
        dr * dr + dg * dg + db * db + da * da < COLOR_EPSILON * COLOR_EPSILON
    }
}

impl Default for ColorSample {
    fn default() -> Self {
        Self::default_background()
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8_roundtrip() {
        let c = ColorSample::from_rgb8([15, 59, 58]);
        assert_eq!(c.to_rgb8(), [15, 59, 58]);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let a = ColorSample::rgb(0.1, 0.2, 0.3);
        let b = ColorSample::rgb(0.9, 0.4, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.3).abs() < 1e-6);
        assert!((mid.b - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_approx_eq_tolerates_rounding() {
        let a = ColorSample::rgb(0.25, 0.5, 0.75);
        let b = ColorSample::rgb(0.25 + 1e-7, 0.5, 0.75);
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&ColorSample::rgb(0.26, 0.5, 0.75)));
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(ColorSample::from_rgb8([15, 59, 58]).to_string(), "#0f3b3a");
        assert_eq!(ColorSample::rgb(2.0, -1.0, 1.0).to_string(), "#ff00ff");
    }

    #[test]
    fn test_brightness_is_max_channel() {
        let c = ColorSample::rgb(0.2, 0.7, 0.4);
        assert!((c.brightness() - 0.7).abs() < 1e-6);
    }
}
