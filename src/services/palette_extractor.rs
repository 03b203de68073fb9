//! Dominant-palette extraction from images.
//!
//! Runs k-means (with k-means++ seeding) over the RGB pixels of a PNG and
//! returns the cluster centroids ordered by population. The CLI matches
//! each centroid against the dye catalog afterward.

use std::path::Path;

use rand::Rng;

use dye_color::Rgb;

use crate::error::AppError;

/// Iteration cap; clustering on photographic input converges well before.
const MAX_ITERATIONS: usize = 32;

/// Centroid movement (squared, in RGB units) below which we stop early.
const CONVERGENCE_EPSILON: f64 = 0.25;

/// One extracted palette entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedColor {
    /// Cluster centroid rounded to 8-bit RGB
    pub rgb: Rgb,
    /// Fraction of pixels assigned to this cluster, `(0, 1]`
    pub share: f64,
}

/// Decode a PNG into a flat pixel list.
///
/// Indexed, grayscale, and 16-bit images are normalized to 8-bit
/// RGB/RGBA first; alpha is discarded.
pub fn decode_png_pixels(path: &Path) -> Result<Vec<Rgb>, AppError> {
    let file = std::fs::File::open(path)?;
    let mut decoder = png::Decoder::new(file);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let pixels = match info.color_type {
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect(),
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().map(|&v| Rgb::new(v, v, v)).collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|p| Rgb::new(p[0], p[0], p[0]))
            .collect(),
        png::ColorType::Indexed => {
            // normalize_to_color8 expands indexed images; reaching this
            // arm means the decoder skipped the transformation
            return Err(AppError::Asset(
                "indexed PNG was not expanded during decode".to_string(),
            ));
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        pixels = bytes.len(),
        "Decoded PNG"
    );
    Ok(pixels)
}

/// Cluster pixels into at most `k` dominant colors.
///
/// Returns fewer than `k` entries when the image has fewer distinct
/// colors than requested. Entries are ordered by descending share.
pub fn extract_palette(pixels: &[Rgb], k: usize, rng: &mut impl Rng) -> Vec<ExtractedColor> {
    if pixels.is_empty() || k == 0 {
        return Vec::new();
    }

    let points: Vec<[f64; 3]> = pixels
        .iter()
        .map(|p| [p.r as f64, p.g as f64, p.b as f64])
        .collect();

    let mut centroids = seed_centroids(&points, k, rng);
    let mut assignment = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        // Assign each pixel to its nearest centroid
        for (i, point) in points.iter().enumerate() {
            assignment[i] = nearest_centroid(point, &centroids);
        }

        // Recompute centroids as cluster means
        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (point, &cluster) in points.iter().zip(&assignment) {
            for c in 0..3 {
                sums[cluster][c] += point[c];
            }
            counts[cluster] += 1;
        }

        let mut max_shift = 0.0f64;
        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            if counts[cluster] == 0 {
                // Empty cluster: reseed to the point farthest from its
                // current centroid so the cluster count is preserved
                let far = points
                    .iter()
                    .max_by(|a, b| {
                        distance_squared(a, centroid)
                            .partial_cmp(&distance_squared(b, centroid))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .copied()
                    .unwrap_or(*centroid);
                *centroid = far;
                max_shift = f64::MAX;
                continue;
            }
            let next = [
                sums[cluster][0] / counts[cluster] as f64,
                sums[cluster][1] / counts[cluster] as f64,
                sums[cluster][2] / counts[cluster] as f64,
            ];
            max_shift = max_shift.max(distance_squared(centroid, &next));
            *centroid = next;
        }

        if max_shift < CONVERGENCE_EPSILON {
            break;
        }
    }

    // Final assignment with the settled centroids
    for (i, point) in points.iter().enumerate() {
        assignment[i] = nearest_centroid(point, &centroids);
    }
    let mut counts = vec![0usize; centroids.len()];
    for &cluster in &assignment {
        counts[cluster] += 1;
    }

    let total = points.len() as f64;
    let mut extracted: Vec<ExtractedColor> = centroids
        .iter()
        .zip(&counts)
        .filter(|(_, &count)| count > 0)
        .map(|(centroid, &count)| ExtractedColor {
            rgb: Rgb::new(
                centroid[0].round().clamp(0.0, 255.0) as u8,
                centroid[1].round().clamp(0.0, 255.0) as u8,
                centroid[2].round().clamp(0.0, 255.0) as u8,
            ),
            share: count as f64 / total,
        })
        .collect();

    extracted.sort_by(|a, b| {
        b.share
            .partial_cmp(&a.share)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    extracted
}

/// k-means++ seeding: the first centroid is uniform-random, each later
/// one is drawn weighted by squared distance to the nearest chosen seed.
fn seed_centroids(points: &[[f64; 3]], k: usize, rng: &mut impl Rng) -> Vec<[f64; 3]> {
    let k = k.min(points.len());
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| distance_squared(p, c))
                    .fold(f64::MAX, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            // Fewer distinct colors than clusters requested
            break;
        }

        let mut target = rng.gen::<f64>() * total;
        let mut chosen = points.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            target -= w;
            if target <= 0.0 {
                chosen = i;
                break;
            }
        }
        centroids.push(points[chosen]);
    }
    centroids
}

fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_d = f64::MAX;
    for (i, c) in centroids.iter().enumerate() {
        let d = distance_squared(point, c);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

#[inline]
fn distance_squared(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn block(color: Rgb, count: usize) -> Vec<Rgb> {
        vec![color; count]
    }

    #[test]
    fn empty_input_yields_empty_palette() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(extract_palette(&[], 4, &mut rng).is_empty());
        assert!(extract_palette(&[Rgb::new(1, 2, 3)], 0, &mut rng).is_empty());
    }

    #[test]
    fn single_color_image_yields_that_color() {
        let mut rng = StdRng::seed_from_u64(2);
        let pixels = block(Rgb::new(200, 40, 10), 100);
        let palette = extract_palette(&pixels, 4, &mut rng);

        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0].rgb, Rgb::new(200, 40, 10));
        assert!((palette[0].share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn separates_well_spaced_colors() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pixels = Vec::new();
        pixels.extend(block(Rgb::new(250, 10, 10), 300));
        pixels.extend(block(Rgb::new(10, 250, 10), 200));
        pixels.extend(block(Rgb::new(10, 10, 250), 100));

        let palette = extract_palette(&pixels, 3, &mut rng);
        assert_eq!(palette.len(), 3);

        // Ordered by population: red, green, blue
        assert!((palette[0].share - 0.5).abs() < 0.01);
        assert_eq!(palette[0].rgb, Rgb::new(250, 10, 10));
        assert_eq!(palette[1].rgb, Rgb::new(10, 250, 10));
        assert_eq!(palette[2].rgb, Rgb::new(10, 10, 250));

        let total: f64 = palette.iter().map(|e| e.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn requesting_more_clusters_than_colors_is_fine() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pixels = Vec::new();
        pixels.extend(block(Rgb::new(0, 0, 0), 50));
        pixels.extend(block(Rgb::new(255, 255, 255), 50));

        let palette = extract_palette(&pixels, 8, &mut rng);
        assert!(palette.len() <= 2);
        assert!(!palette.is_empty());
    }

    #[test]
    fn decode_png_round_trip() {
        // Encode a tiny RGB image with the png crate, then decode it back
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");

        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(file, 2, 2);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&[
                255, 0, 0, //
                0, 255, 0, //
                0, 0, 255, //
                255, 255, 255,
            ])
            .unwrap();
        writer.finish().unwrap();

        let pixels = decode_png_pixels(&path).unwrap();
        assert_eq!(
            pixels,
            vec![
                Rgb::new(255, 0, 0),
                Rgb::new(0, 255, 0),
                Rgb::new(0, 0, 255),
                Rgb::new(255, 255, 255),
            ]
        );
    }
}
