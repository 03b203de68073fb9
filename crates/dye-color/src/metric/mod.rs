//! Perceptual distance metrics.
//!
//! [`DistanceMetric`] is a closed enum with a single dispatch point,
//! [`DistanceMetric::evaluate`]. Adding a metric means extending the enum
//! and the one `match` below; no call site branches on metric names.

mod ciede2000;

pub use ciede2000::ciede2000;

use std::fmt;

use crate::color::{hue_distance, Lab, Oklab, Oklch, Rgb};

/// Default lightness weight for [`DistanceMetric::HyAb`].
pub const DEFAULT_HYAB_LIGHTNESS_WEIGHT: f64 = 1.0;

/// A selectable perceptual distance formula.
///
/// All formulas are deterministic, side-effect-free functions of their two
/// inputs, and all are symmetric.
///
/// # Example
///
/// ```
/// use dye_color::{DistanceMetric, Rgb};
///
/// let black = Rgb::new(0, 0, 0);
/// let white = Rgb::new(255, 255, 255);
///
/// let d = DistanceMetric::Rgb.evaluate(black, white);
/// assert!((d - 441.67).abs() < 0.01);
///
/// // Every metric reports zero distance for identical colors
/// assert_eq!(DistanceMetric::Cie2000.evaluate(white, white), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceMetric {
    /// Plain Euclidean distance in 8-bit RGB. The fast path: the spatial
    /// index can prune by tree geometry alone under this metric.
    #[default]
    Rgb,
    /// CIE76: Euclidean distance in CIELAB.
    Cie76,
    /// Full CIEDE2000 (ΔE00) per CIE TR 142-2001.
    Cie2000,
    /// Euclidean distance in OKLab.
    Oklab,
    /// HyAB hybrid distance in OKLab: `w * |dL| + sqrt(da^2 + db^2)`.
    HyAb {
        /// Weight applied to the lightness term
        lightness_weight: f64,
    },
    /// Independently weighted L/C/H distance in OKLCH. The hue term is
    /// circular and scaled by chroma (`2 * sqrt(C1*C2) * sin(dh/2)`), so
    /// hue differences between near-grey colors contribute little.
    OklchWeighted {
        /// Weight on the squared lightness difference
        l_weight: f64,
        /// Weight on the squared chroma difference
        c_weight: f64,
        /// Weight on the squared hue contribution
        h_weight: f64,
    },
}

impl DistanceMetric {
    /// HyAB with the default lightness weight.
    pub const fn hyab() -> Self {
        Self::HyAb {
            lightness_weight: DEFAULT_HYAB_LIGHTNESS_WEIGHT,
        }
    }

    /// OKLCH-weighted with unit weights.
    pub const fn oklch_weighted() -> Self {
        Self::OklchWeighted {
            l_weight: 1.0,
            c_weight: 1.0,
            h_weight: 1.0,
        }
    }

    /// True for the metric whose geometry matches the spatial index's
    /// Euclidean RGB partitioning, enabling pure tree pruning.
    #[inline]
    pub fn is_euclidean_rgb(self) -> bool {
        matches!(self, Self::Rgb)
    }

    /// Compute the distance between two colors under this metric.
    ///
    /// This is the single dispatch point for all metric kinds.
    pub fn evaluate(self, a: Rgb, b: Rgb) -> f64 {
        match self {
            Self::Rgb => a.distance(b),
            Self::Cie76 => Lab::from(a).distance(Lab::from(b)),
            Self::Cie2000 => ciede2000(Lab::from(a), Lab::from(b)),
            Self::Oklab => Oklab::from(a).distance(Oklab::from(b)),
            Self::HyAb { lightness_weight } => {
                Oklab::from(a).hyab_distance(Oklab::from(b), lightness_weight)
            }
            Self::OklchWeighted {
                l_weight,
                c_weight,
                h_weight,
            } => {
                let x = Oklch::from(a);
                let y = Oklch::from(b);
                let dl = x.l - y.l;
                let dc = x.c - y.c;
                let dh_angle = hue_distance(x.h, y.h).to_radians();
                let dh = 2.0 * (x.c * y.c).sqrt() * (dh_angle / 2.0).sin();
                (l_weight * dl * dl + c_weight * dc * dc + h_weight * dh * dh).sqrt()
            }
        }
    }

    /// Parse a metric from its configuration name.
    ///
    /// Recognized names: `rgb`, `cie76`, `cie2000`, `oklab`, `hyab`,
    /// `oklch-weighted`. Parameterized metrics get their default weights.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rgb" => Some(Self::Rgb),
            "cie76" => Some(Self::Cie76),
            "cie2000" => Some(Self::Cie2000),
            "oklab" => Some(Self::Oklab),
            "hyab" => Some(Self::hyab()),
            "oklch-weighted" => Some(Self::oklch_weighted()),
            _ => None,
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => f.write_str("rgb"),
            Self::Cie76 => f.write_str("cie76"),
            Self::Cie2000 => f.write_str("cie2000"),
            Self::Oklab => f.write_str("oklab"),
            Self::HyAb { .. } => f.write_str("hyab"),
            Self::OklchWeighted { .. } => f.write_str("oklch-weighted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DistanceMetric; 6] = [
        DistanceMetric::Rgb,
        DistanceMetric::Cie76,
        DistanceMetric::Cie2000,
        DistanceMetric::Oklab,
        DistanceMetric::HyAb {
            lightness_weight: 1.0,
        },
        DistanceMetric::OklchWeighted {
            l_weight: 1.0,
            c_weight: 1.0,
            h_weight: 1.0,
        },
    ];

    #[test]
    fn identity_is_zero_under_every_metric() {
        let colors = [
            Rgb::new(0, 0, 0),
            Rgb::new(255, 255, 255),
            Rgb::new(255, 87, 51),
            Rgb::new(12, 200, 77),
        ];
        for metric in ALL {
            for c in colors {
                let d = metric.evaluate(c, c);
                assert!(d.abs() < 1e-9, "{metric} distance({c}, {c}) = {d}");
            }
        }
    }

    #[test]
    fn every_metric_is_symmetric() {
        let a = Rgb::new(200, 30, 90);
        let b = Rgb::new(10, 240, 130);
        for metric in ALL {
            let ab = metric.evaluate(a, b);
            let ba = metric.evaluate(b, a);
            assert!(
                (ab - ba).abs() < 1e-9,
                "{metric} asymmetric: {ab} vs {ba}"
            );
        }
    }

    #[test]
    fn rgb_black_white_distance() {
        let d = DistanceMetric::Rgb.evaluate(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255));
        assert!((d - 441.6729559300637).abs() < 1e-9);
    }

    #[test]
    fn hyab_lightness_weight_scales_grey_axis() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        let d1 = DistanceMetric::HyAb {
            lightness_weight: 1.0,
        }
        .evaluate(black, white);
        let d2 = DistanceMetric::HyAb {
            lightness_weight: 2.0,
        }
        .evaluate(black, white);
        // Achromatic pair: only the weighted lightness term contributes
        assert!((d2 - 2.0 * d1).abs() < 1e-9);
    }

    #[test]
    fn oklch_hue_term_vanishes_for_greys() {
        // Two greys have zero chroma, so the hue contribution must be
        // exactly zero no matter its weight
        let a = Rgb::new(60, 60, 60);
        let b = Rgb::new(61, 61, 61);
        let low = DistanceMetric::OklchWeighted {
            l_weight: 1.0,
            c_weight: 1.0,
            h_weight: 0.0,
        }
        .evaluate(a, b);
        let high = DistanceMetric::OklchWeighted {
            l_weight: 1.0,
            c_weight: 1.0,
            h_weight: 100.0,
        }
        .evaluate(a, b);
        assert!((low - high).abs() < 1e-9);
    }

    #[test]
    fn parse_names() {
        assert_eq!(DistanceMetric::parse_name("rgb"), Some(DistanceMetric::Rgb));
        assert_eq!(
            DistanceMetric::parse_name("CIE2000"),
            Some(DistanceMetric::Cie2000)
        );
        assert_eq!(
            DistanceMetric::parse_name("hyab"),
            Some(DistanceMetric::hyab())
        );
        assert_eq!(
            DistanceMetric::parse_name("oklch-weighted"),
            Some(DistanceMetric::oklch_weighted())
        );
        assert_eq!(DistanceMetric::parse_name("manhattan"), None);
    }

    #[test]
    fn default_is_rgb() {
        assert_eq!(DistanceMetric::default(), DistanceMetric::Rgb);
        assert!(DistanceMetric::Rgb.is_euclidean_rgb());
        assert!(!DistanceMetric::Cie2000.is_euclidean_rgb());
    }
}
