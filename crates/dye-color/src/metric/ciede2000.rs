//! CIEDE2000 color difference (ΔE00).
//!
//! Full implementation of the CIE Technical Report 142-2001 formula,
//! including the G-factor a* correction, the T hue weighting function, the
//! SL/SC/SH weighting functions, and the blue-region rotation term. The
//! constants below are the published values, not approximations.

#![allow(clippy::excessive_precision)]

use std::f64::consts::PI;

use crate::color::Lab;

// 25^7, shared by the G factor and the rotation term
const POW7_25: f64 = 6_103_515_625.0;

/// CIEDE2000 difference between two LAB colors.
///
/// Parametric factors kL, kC, kH are fixed at 1.0 (graphic-arts reference
/// conditions). Lower values mean more similar colors; a ΔE00 below 1.0 is
/// generally imperceptible.
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    const KL: f64 = 1.0;
    const KC: f64 = 1.0;
    const KH: f64 = 1.0;

    let (l1, a1, b1) = (lab1.l, lab1.a, lab1.b);
    let (l2, a2, b2) = (lab2.l, lab2.a, lab2.b);

    // Mean chroma drives the G factor that rescales the a* axis
    let c1_ab = a1.hypot(b1);
    let c2_ab = a2.hypot(b2);
    let c_ab_mean = (c1_ab + c2_ab) / 2.0;

    let c_ab_mean_pow7 = c_ab_mean.powi(7);
    let g = 0.5 * (1.0 - (c_ab_mean_pow7 / (c_ab_mean_pow7 + POW7_25)).sqrt());

    let a1_prime = a1 * (1.0 + g);
    let a2_prime = a2 * (1.0 + g);

    let c1_prime = a1_prime.hypot(b1);
    let c2_prime = a2_prime.hypot(b2);

    let h1_prime = hue_angle(a1_prime, b1);
    let h2_prime = hue_angle(a2_prime, b2);

    let delta_l_prime = l2 - l1;
    let delta_c_prime = c2_prime - c1_prime;

    // Hue difference, folded into (-180, 180]; undefined when either
    // chroma is zero
    let delta_h_prime = if c1_prime * c2_prime == 0.0 {
        0.0
    } else {
        let delta_h = h2_prime - h1_prime;
        if delta_h.abs() <= 180.0 {
            delta_h
        } else if delta_h > 180.0 {
            delta_h - 360.0
        } else {
            delta_h + 360.0
        }
    };

    let delta_big_h_prime =
        2.0 * (c1_prime * c2_prime).sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    let l_prime_mean = (l1 + l2) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;

    let h_prime_mean = if c1_prime * c2_prime == 0.0 {
        h1_prime + h2_prime
    } else {
        let h_diff = (h1_prime - h2_prime).abs();
        if h_diff <= 180.0 {
            (h1_prime + h2_prime) / 2.0
        } else if h1_prime + h2_prime < 360.0 {
            (h1_prime + h2_prime + 360.0) / 2.0
        } else {
            (h1_prime + h2_prime - 360.0) / 2.0
        }
    };

    let h_prime_mean_rad = h_prime_mean.to_radians();
    let t = 1.0 - 0.17 * (h_prime_mean_rad - PI / 6.0).cos()
        + 0.24 * (2.0 * h_prime_mean_rad).cos()
        + 0.32 * (3.0 * h_prime_mean_rad + PI / 30.0).cos()
        - 0.20 * (4.0 * h_prime_mean_rad - 63.0 * PI / 180.0).cos();

    let l_mean_minus_50_sq = (l_prime_mean - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_mean_minus_50_sq) / (20.0 + l_mean_minus_50_sq).sqrt();
    let sc = 1.0 + 0.045 * c_prime_mean;
    let sh = 1.0 + 0.015 * c_prime_mean * t;

    // Rotation term, active in the blue region around h' = 275 degrees
    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let c_prime_mean_pow7 = c_prime_mean.powi(7);
    let rc = 2.0 * (c_prime_mean_pow7 / (c_prime_mean_pow7 + POW7_25)).sqrt();
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let term_l = delta_l_prime / (KL * sl);
    let term_c = delta_c_prime / (KC * sc);
    let term_h = delta_big_h_prime / (KH * sh);

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h).sqrt()
}

/// Hue angle in degrees, `[0, 360)`; zero for the achromatic axis.
fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        0.0
    } else {
        let mut h = b.atan2(a).to_degrees();
        if h < 0.0 {
            h += 360.0;
        }
        h
    }
}
