//! CIELAB and CIE LCh(ab) color spaces.
//!
//! RGB converts to LAB through CIE XYZ under the D65 illuminant, using the
//! published sRGB companding curve and matrix coefficients. Coordinates are
//! formula-defined floats and are intentionally not clamped.

use super::{linear_to_srgb, srgb_to_linear};
use crate::color::Rgb;

// D65 reference white
const D65_XN: f64 = 0.95047;
const D65_YN: f64 = 1.00000;
const D65_ZN: f64 = 1.08883;

// 6/29 threshold of the LAB transfer function
const DELTA: f64 = 6.0 / 29.0;

/// A color in CIELAB space.
///
/// `l` is lightness (0 black to 100 white); `a` spans green (negative) to
/// red (positive); `b` spans blue (negative) to yellow (positive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness, 0..=100 for in-gamut colors
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Lab {
    /// Create a new LAB color.
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Euclidean distance in LAB space. This is the CIE76 color difference.
    #[inline]
    pub fn distance(self, other: Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// A color in CIE LCh(ab): LAB in cylindrical form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    /// Lightness, as in LAB
    pub l: f64,
    /// Chroma, `hypot(a, b)`
    pub c: f64,
    /// Hue angle in degrees, `[0, 360)`
    pub h: f64,
}

impl From<Rgb> for Lab {
    /// Convert RGB to LAB via XYZ (D65).
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r as f64 / 255.0);
        let g = srgb_to_linear(rgb.g as f64 / 255.0);
        let b = srgb_to_linear(rgb.b as f64 / 255.0);

        // Linear sRGB to XYZ (sRGB D65 matrix)
        let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
        let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
        let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

        let fx = lab_f(x / D65_XN);
        let fy = lab_f(y / D65_YN);
        let fz = lab_f(z / D65_ZN);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Lab> for Rgb {
    /// Convert LAB back to RGB, clamping to the 8-bit sRGB gamut.
    fn from(lab: Lab) -> Self {
        let fy = (lab.l + 16.0) / 116.0;
        let fx = fy + lab.a / 500.0;
        let fz = fy - lab.b / 200.0;

        let x = lab_f_inv(fx) * D65_XN;
        let y = lab_f_inv(fy) * D65_YN;
        let z = lab_f_inv(fz) * D65_ZN;

        // XYZ to linear sRGB (inverse matrix)
        let r = x * 3.2404542 + y * -1.5371385 + z * -0.4985314;
        let g = x * -0.9692660 + y * 1.8760108 + z * 0.0415560;
        let b = x * 0.0556434 + y * -0.2040259 + z * 1.0572252;

        Rgb::new(compand_byte(r), compand_byte(g), compand_byte(b))
    }
}

impl From<Lab> for Lch {
    fn from(lab: Lab) -> Self {
        Self {
            l: lab.l,
            c: lab.a.hypot(lab.b),
            h: super::normalize_hue(lab.b.atan2(lab.a).to_degrees()),
        }
    }
}

impl From<Lch> for Lab {
    fn from(lch: Lch) -> Self {
        let h = lch.h.to_radians();
        Self {
            l: lch.l,
            a: lch.c * h.cos(),
            b: lch.c * h.sin(),
        }
    }
}

impl From<Rgb> for Lch {
    fn from(rgb: Rgb) -> Self {
        Lch::from(Lab::from(rgb))
    }
}

impl From<Lch> for Rgb {
    fn from(lch: Lch) -> Self {
        Rgb::from(Lab::from(lch))
    }
}

/// LAB transfer function with the linear segment below the 6/29 cube.
fn lab_f(t: f64) -> f64 {
    const DELTA_CUBE: f64 = DELTA * DELTA * DELTA;
    if t > DELTA_CUBE {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Inverse of [`lab_f`].
fn lab_f_inv(t: f64) -> f64 {
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

#[inline]
fn compand_byte(linear: f64) -> u8 {
    (linear_to_srgb(linear.clamp(0.0, 1.0)) * 255.0)
        .round()
        .clamp(0.0, 255.0) as u8
}
