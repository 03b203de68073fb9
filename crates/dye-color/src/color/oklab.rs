//! OKLab and OKLCH perceptual color spaces.
//!
//! OKLab (Björn Ottosson, 2020) is a perceptually uniform space where
//! Euclidean distance tracks human-perceived color difference; OKLCH is its
//! cylindrical form. Coordinates are formula-defined and not clamped.
//!
//! # References
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::{linear_to_srgb, normalize_hue, srgb_to_linear};
use crate::color::Rgb;

/// A color in OKLab space.
///
/// `l` is lightness (0 black to 1 white for in-gamut colors); `a` spans
/// green (negative) to red (positive); `b` spans blue (negative) to yellow
/// (positive), both typically within ±0.4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Lightness, 0.0..=1.0 for in-gamut colors
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Oklab {
    /// Create a new OKLab color.
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance in OKLab space.
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Euclidean distance in OKLab space.
    #[inline]
    pub fn distance(self, other: Oklab) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Chroma magnitude, `hypot(a, b)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }

    /// HyAB hybrid distance (Abasi et al., 2020).
    ///
    /// Manhattan distance for lightness, Euclidean for chrominance:
    /// `kl * |dL| + sqrt(da^2 + db^2)`. With `lightness_weight > 1`,
    /// lightness differences dominate, which keeps greys from matching
    /// chromatic colors of similar lightness.
    #[inline]
    pub fn hyab_distance(self, other: Oklab, lightness_weight: f64) -> f64 {
        let dl = (self.l - other.l).abs();
        let da = self.a - other.a;
        let db = self.b - other.b;
        lightness_weight * dl + (da * da + db * db).sqrt()
    }
}

/// A color in OKLCH: OKLab in cylindrical form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    /// Lightness, as in OKLab
    pub l: f64,
    /// Chroma, `hypot(a, b)`
    pub c: f64,
    /// Hue angle in degrees, `[0, 360)`
    pub h: f64,
}

impl From<Rgb> for Oklab {
    /// Convert 8-bit sRGB to OKLab.
    ///
    /// Gamma-expands to linear light, then applies the 2021-01-25 revision
    /// of Ottosson's M1/M2 matrices with the cube-root nonlinearity.
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r as f64 / 255.0);
        let g = srgb_to_linear(rgb.g as f64 / 255.0);
        let b = srgb_to_linear(rgb.b as f64 / 255.0);

        let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
        let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
        let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Self {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

impl From<Oklab> for Rgb {
    /// Convert OKLab back to 8-bit sRGB, clamping to the gamut.
    fn from(lab: Oklab) -> Self {
        let l_ = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
        let m_ = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
        let s_ = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
        let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
        let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

        Rgb::new(compand_byte(r), compand_byte(g), compand_byte(b))
    }
}

impl From<Oklab> for Oklch {
    fn from(lab: Oklab) -> Self {
        Self {
            l: lab.l,
            c: lab.chroma(),
            h: normalize_hue(lab.b.atan2(lab.a).to_degrees()),
        }
    }
}

impl From<Oklch> for Oklab {
    fn from(lch: Oklch) -> Self {
        let h = lch.h.to_radians();
        Self {
            l: lch.l,
            a: lch.c * h.cos(),
            b: lch.c * h.sin(),
        }
    }
}

impl From<Rgb> for Oklch {
    fn from(rgb: Rgb) -> Self {
        Oklch::from(Oklab::from(rgb))
    }
}

impl From<Oklch> for Rgb {
    fn from(lch: Oklch) -> Self {
        Rgb::from(Oklab::from(lch))
    }
}

#[inline]
fn compand_byte(linear: f64) -> u8 {
    (linear_to_srgb(linear.clamp(0.0, 1.0)) * 255.0)
        .round()
        .clamp(0.0, 255.0) as u8
}
