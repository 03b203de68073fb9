//! Fixed-width circular hue bucket index.
//!
//! 36 buckets of 10° span the hue circle. Buckets wrap: bucket 35
//! (350°..360°) is adjacent to bucket 0. Built once from the catalog,
//! excluding Facewear, so every consumer is exclusion-correct by
//! construction.

use crate::catalog::Catalog;
use crate::color::normalize_hue;

/// Number of hue buckets.
pub const BUCKET_COUNT: usize = 36;

/// Angular width of one bucket, in degrees.
pub const BUCKET_WIDTH: f64 = 360.0 / BUCKET_COUNT as f64;

/// Circular bucket index over catalog hues.
#[derive(Debug)]
pub struct HueIndex {
    buckets: Vec<Vec<usize>>,
}

impl HueIndex {
    /// Build the index from a catalog, skipping Facewear entries.
    pub fn new(catalog: &Catalog) -> Self {
        let mut buckets = vec![Vec::new(); BUCKET_COUNT];
        for (slot, dye) in catalog.dyes().iter().enumerate() {
            if dye.is_facewear() {
                continue;
            }
            buckets[Self::bucket_for(dye.hsv().h)].push(slot);
        }
        Self { buckets }
    }

    /// The bucket containing a hue angle.
    pub fn bucket_for(hue: f64) -> usize {
        let normalized = normalize_hue(hue);
        // normalized < 360, so the quotient is at most 35
        (normalized / BUCKET_WIDTH) as usize
    }

    /// Catalog slots of the dyes whose hue falls in bucket `index`.
    pub fn dyes_in_bucket(&self, index: usize) -> &[usize] {
        &self.buckets[index]
    }

    /// The contiguous (possibly wrap-around) bucket indices whose range
    /// intersects `[target - tolerance, target + tolerance]`.
    ///
    /// A tolerance of 180° or more covers the whole circle.
    pub fn buckets_to_search(target_hue: f64, tolerance: f64) -> Vec<usize> {
        let tolerance = tolerance.abs();
        if tolerance >= 180.0 {
            return (0..BUCKET_COUNT).collect();
        }

        let first = Self::bucket_for(target_hue - tolerance);
        let last = Self::bucket_for(target_hue + tolerance);

        let mut buckets = Vec::new();
        let mut current = first;
        loop {
            buckets.push(current);
            if current == last {
                break;
            }
            current = (current + 1) % BUCKET_COUNT;
        }
        buckets
    }

    /// Total indexed dyes across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// True when no dyes are indexed.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dye;
    use crate::color::{Hsv, Rgb};

    fn dye_with_hue(id: u32, hue: f64) -> Dye {
        // Build an RGB whose derived hue lands in the right bucket
        let rgb = Rgb::from(Hsv::new(hue, 90.0, 90.0).unwrap());
        Dye::new(id, format!("dye-{id}"), "Red", rgb)
    }

    #[test]
    fn bucket_for_boundaries() {
        assert_eq!(HueIndex::bucket_for(0.0), 0);
        assert_eq!(HueIndex::bucket_for(9.99), 0);
        assert_eq!(HueIndex::bucket_for(10.0), 1);
        assert_eq!(HueIndex::bucket_for(355.0), 35);
        assert_eq!(HueIndex::bucket_for(360.0), 0);
        assert_eq!(HueIndex::bucket_for(-5.0), 35);
    }

    #[test]
    fn search_span_without_wrap() {
        // 100 plus or minus 25 covers 75..125, buckets 7..=12
        let buckets = HueIndex::buckets_to_search(100.0, 25.0);
        assert_eq!(buckets, vec![7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn search_span_wraps_around_zero() {
        // 5 plus or minus 15 covers 350..20, buckets 35, 0, 1, 2
        let buckets = HueIndex::buckets_to_search(5.0, 15.0);
        assert_eq!(buckets, vec![35, 0, 1, 2]);
    }

    #[test]
    fn wide_tolerance_covers_every_bucket() {
        let buckets = HueIndex::buckets_to_search(123.0, 180.0);
        assert_eq!(buckets.len(), BUCKET_COUNT);
        let buckets = HueIndex::buckets_to_search(0.0, 400.0);
        assert_eq!(buckets.len(), BUCKET_COUNT);
    }

    #[test]
    fn zero_tolerance_is_a_single_bucket() {
        assert_eq!(HueIndex::buckets_to_search(42.0, 0.0), vec![4]);
    }

    #[test]
    fn index_places_dyes_by_hue() {
        let catalog = Catalog::new(vec![
            dye_with_hue(1, 5.0),
            dye_with_hue(2, 15.0),
            dye_with_hue(3, 17.0),
            dye_with_hue(4, 355.0),
        ])
        .unwrap();
        let index = HueIndex::new(&catalog);

        assert_eq!(index.dyes_in_bucket(0), &[0]);
        assert_eq!(index.dyes_in_bucket(1), &[1, 2]);
        assert_eq!(index.dyes_in_bucket(35), &[3]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn facewear_never_enters_the_index() {
        let catalog = Catalog::new(vec![
            dye_with_hue(1, 5.0),
            Dye::new(2, "mask", "Facewear", Rgb::new(200, 30, 30)),
        ])
        .unwrap();
        let index = HueIndex::new(&catalog);
        assert_eq!(index.len(), 1);
        for bucket in 0..BUCKET_COUNT {
            assert!(!index.dyes_in_bucket(bucket).contains(&1));
        }
    }
}
