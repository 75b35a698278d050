//! Color conversion utilities.
//!
//! RGB ↔ HSV conversion and the brightness helpers the engine builds its
//! palette from. Everything here is a pure function over [`ColorSample`].

use crate::color::ColorSample;

/// Convert HSV to RGB, with hue in degrees `[0, 360)`.
///
/// `v` is not clamped. Every channel scales linearly with it, so `v > 1`
/// yields channels above 1 and `v < 0` yields negative channels.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Convert RGB to HSV.
///
/// Returns `(h, s, v)` with hue in degrees `[0, 360)` and saturation/value in
/// `[0, 1]` for in-range input. Achromatic colors get hue 0.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    if delta <= 0.0 {
        return (0.0, s, v);
    }

    let h = if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };
    (h, s, v)
}

/// Brightness (V component of HSV) of a color.
pub fn brightness(c: ColorSample) -> f32 {
    rgb_to_hsv(c.r, c.g, c.b).2
}

/// Multiply a color's brightness by `factor`, keeping hue, saturation and alpha.
///
/// `factor` is not clamped; see [`hsv_to_rgb`] for what out-of-range values do.
pub fn scale_brightness(c: ColorSample, factor: f32) -> ColorSample {
    let (h, s, v) = rgb_to_hsv(c.r, c.g, c.b);
    let (r, g, b) = hsv_to_rgb(h, s, v * factor);
    ColorSample::new(r, g, b, c.a)
}

/// Replace a color's brightness with `value`, keeping hue, saturation and alpha.
pub fn override_brightness(c: ColorSample, value: f32) -> ColorSample {
    let (h, s, _) = rgb_to_hsv(c.r, c.g, c.b);
    let (r, g, b) = hsv_to_rgb(h, s, value);
    ColorSample::new(r, g, b, c.a)
}
