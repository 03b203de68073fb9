//! Color types and pure conversion math.
//!
//! Every conversion in this module is a stateless, deterministic function of
//! its input, which is what makes the results memoizable by the cache layer.
//!
//! # Spaces
//!
//! - [`Rgb`]: 8-bit sRGB, the catalog's native representation and hex wire form
//! - [`Hsv`] / [`Hsl`]: cylindrical spaces for hue bucketing and tonal ranking
//! - [`Lab`] / [`Lch`]: CIE 1976 L*a*b* and its cylindrical form (D65)
//! - [`Oklab`] / [`Oklch`]: Ottosson's perceptually uniform space
//!
//! # Example
//!
//! ```
//! use dye_color::{Hsv, Rgb};
//!
//! let rgb: Rgb = "#FF5733".parse().unwrap();
//! let hsv = Hsv::from(rgb);
//! assert!(hsv.h > 10.0 && hsv.h < 12.0);
//! ```

mod hsv;
mod lab;
mod oklab;
mod rgb;

pub use hsv::{hue_distance, normalize_hue, Hsl, Hsv};
pub use lab::{Lab, Lch};
pub use oklab::{Oklab, Oklch};
pub use rgb::Rgb;

/// sRGB gamma expansion (IEC 61966-2-1).
pub(crate) fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma companding, the inverse of [`srgb_to_linear`].
pub(crate) fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_round_trip() {
        for c in [0.0, 0.003, 0.04, 0.2, 0.5, 0.9, 1.0] {
            let back = srgb_to_linear(linear_to_srgb(c));
            assert!((back - c).abs() < 1e-12, "gamma round trip failed at {c}");
        }
    }

    #[test]
    fn gamma_known_values() {
        // sRGB 0.5 expands to linear ~0.2140
        assert!((srgb_to_linear(0.5) - 0.214041).abs() < 1e-5);
        // linear 0.5 compands to sRGB ~0.7354
        assert!((linear_to_srgb(0.5) - 0.735356).abs() < 1e-5);
    }
}
