//! HSV and HSL cylindrical color types.
//!
//! Hue is measured in degrees on the circular range `[0, 360)`; saturation,
//! value, and lightness are percentages in `[0, 100]`. Hue inputs outside
//! the circle are reduced into it before any computation (including cache
//! key construction), so 359.9999° and 0.0001° are numerically adjacent
//! rather than distinct values.

use crate::color::Rgb;
use crate::error::ColorError;

/// Reduce a hue angle into `[0, 360)`.
///
/// Equivalent to `((h mod 360) + 360) mod 360`; handles negative input.
///
/// # Example
///
/// ```
/// use dye_color::color::normalize_hue;
///
/// assert_eq!(normalize_hue(-30.0), 330.0);
/// assert_eq!(normalize_hue(720.0), 0.0);
/// assert_eq!(normalize_hue(360.0), 0.0);
/// ```
#[inline]
pub fn normalize_hue(h: f64) -> f64 {
    let reduced = h.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 when h is a tiny negative value
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Circular distance between two hue angles, in `[0, 180]`.
#[inline]
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let diff = (normalize_hue(a) - normalize_hue(b)).abs();
    diff.min(360.0 - diff)
}

/// A color in HSV (hue, saturation, value) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360)`
    pub h: f64,
    /// Saturation percentage, `[0, 100]`
    pub s: f64,
    /// Value percentage, `[0, 100]`
    pub v: f64,
}

impl Hsv {
    /// Create an HSV color, validating its components.
    ///
    /// Hue may be any finite angle and is reduced into `[0, 360)`.
    /// Saturation and value must lie in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] for non-finite components or out-of-range
    /// saturation/value.
    pub fn new(h: f64, s: f64, v: f64) -> Result<Self, ColorError> {
        if !h.is_finite() {
            return Err(ColorError::NonFinite { component: "hue" });
        }
        check_percent(s, "saturation")?;
        check_percent(v, "value")?;
        Ok(Self {
            h: normalize_hue(h),
            s,
            v,
        })
    }
}

/// A color in HSL (hue, saturation, lightness) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`
    pub h: f64,
    /// Saturation percentage, `[0, 100]`
    pub s: f64,
    /// Lightness percentage, `[0, 100]`
    pub l: f64,
}

impl Hsl {
    /// Create an HSL color, validating its components.
    ///
    /// Hue may be any finite angle and is reduced into `[0, 360)`.
    /// Saturation and lightness must lie in `[0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] for non-finite components or out-of-range
    /// saturation/lightness.
    pub fn new(h: f64, s: f64, l: f64) -> Result<Self, ColorError> {
        if !h.is_finite() {
            return Err(ColorError::NonFinite { component: "hue" });
        }
        check_percent(s, "saturation")?;
        check_percent(l, "lightness")?;
        Ok(Self {
            h: normalize_hue(h),
            s,
            l,
        })
    }
}

fn check_percent(value: f64, component: &'static str) -> Result<(), ColorError> {
    if !value.is_finite() {
        return Err(ColorError::NonFinite { component });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ColorError::ComponentOutOfRange {
            component,
            value,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

/// Shared hue computation from normalized channel values.
///
/// `max` and `delta` come from the caller's min/max pass. Returns a hue in
/// `[0, 360)`; an achromatic color (zero delta) has hue 0 by convention.
fn hue_from_channels(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let h = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    normalize_hue(h)
}

impl From<Rgb> for Hsv {
    /// Convert RGB to HSV with a single min/max/delta pass.
    ///
    /// A zero-value color (max channel 0) has saturation 0 by explicit
    /// branch; hue of any achromatic color is 0.
    fn from(rgb: Rgb) -> Self {
        let r = rgb.r as f64 / 255.0;
        let g = rgb.g as f64 / 255.0;
        let b = rgb.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max == 0.0 { 0.0 } else { delta / max * 100.0 };

        Self {
            h: hue_from_channels(r, g, b, max, delta),
            s,
            v: max * 100.0,
        }
    }
}

impl From<Hsv> for Rgb {
    /// Convert HSV to RGB via the sector formula.
    fn from(hsv: Hsv) -> Self {
        let h = normalize_hue(hsv.h);
        let s = hsv.s / 100.0;
        let v = hsv.v / 100.0;

        let c = v * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = sector_rgb(h, c, x);
        Rgb::new(
            channel_byte(r + m),
            channel_byte(g + m),
            channel_byte(b + m),
        )
    }
}

impl From<Rgb> for Hsl {
    /// Convert RGB to HSL with a single min/max/delta pass.
    fn from(rgb: Rgb) -> Self {
        let r = rgb.r as f64 / 255.0;
        let g = rgb.g as f64 / 255.0;
        let b = rgb.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        let s = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * l - 1.0).abs())
        };

        Self {
            h: hue_from_channels(r, g, b, max, delta),
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

impl From<Hsl> for Rgb {
    /// Convert HSL to RGB via the sector formula.
    fn from(hsl: Hsl) -> Self {
        let h = normalize_hue(hsl.h);
        let s = hsl.s / 100.0;
        let l = hsl.l / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = sector_rgb(h, c, x);
        Rgb::new(
            channel_byte(r + m),
            channel_byte(g + m),
            channel_byte(b + m),
        )
    }
}

/// Map a hue sector to its (r, g, b) chroma pattern.
fn sector_rgb(h: f64, c: f64, x: f64) -> (f64, f64, f64) {
    match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    }
}

#[inline]
fn channel_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
