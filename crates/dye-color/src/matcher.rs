//! Nearest-color and within-distance queries over the catalog.
//!
//! The matcher composes the spatial index with the conversion math. Under
//! the default RGB metric, queries run entirely on the k-d tree. Any other
//! metric cannot be pruned by the tree's Euclidean geometry, so those
//! queries score every matchable dye with the exact requested metric and
//! re-rank; the catalog is small enough (a few thousand entries at most)
//! that the scan is the sanctioned fallback.

use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::ConversionCache;
use crate::catalog::{Catalog, Dye};
use crate::color::Rgb;
use crate::error::QueryError;
use crate::index::{KdEntry, KdTree};
use crate::metric::DistanceMetric;

/// A matched dye together with its distance from the query color.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchHit {
    /// The matched catalog entry
    pub dye: Dye,
    /// Distance under the metric the query ran with
    pub distance: f64,
}

/// Nearest-color matcher over an immutable catalog.
///
/// Facewear entries are excluded when the indices are built, so every
/// query is exclusion-correct without per-call filtering.
///
/// # Example
///
/// ```
/// use dye_color::{Catalog, DistanceMetric, Dye, Matcher, Rgb};
/// use std::sync::Arc;
///
/// let catalog = Arc::new(
///     Catalog::new(vec![
///         Dye::new(1, "Dalamud Red", "Red", Rgb::new(171, 27, 33)),
///         Dye::new(2, "Ice Blue", "Blue", Rgb::new(170, 199, 210)),
///     ])
///     .unwrap(),
/// );
///
/// let matcher = Matcher::new(catalog);
/// let hit = matcher
///     .nearest("#AB1B21", &[], DistanceMetric::Rgb)
///     .unwrap()
///     .unwrap();
/// assert_eq!(hit.dye.id(), 1);
/// assert_eq!(hit.distance, 0.0);
/// ```
#[derive(Debug)]
pub struct Matcher {
    catalog: Arc<Catalog>,
    tree: KdTree,
    matchable: Vec<usize>,
    cache: Option<Arc<ConversionCache>>,
}

impl Matcher {
    /// Build a matcher, constructing the spatial index over every
    /// non-Facewear catalog entry.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let matchable = catalog.matchable_slots();
        let entries = matchable
            .iter()
            .map(|&slot| {
                let dye = catalog.slot(slot);
                KdEntry {
                    point: rgb_point(dye.rgb()),
                    id: dye.id(),
                    slot,
                }
            })
            .collect();
        Self {
            catalog,
            tree: KdTree::build(entries),
            matchable,
            cache: None,
        }
    }

    /// Serve hex parsing through a shared conversion cache.
    pub fn with_cache(mut self, cache: Arc<ConversionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of dyes that participate in matching.
    pub fn matchable_len(&self) -> usize {
        self.matchable.len()
    }

    /// Catalog slots of the dyes that participate in matching.
    pub(crate) fn matchable_slots(&self) -> &[usize] {
        &self.matchable
    }

    /// Parse a query color, via the cache when one is attached.
    pub(crate) fn parse_hex(&self, hex: &str) -> Result<Rgb, QueryError> {
        let rgb = match &self.cache {
            Some(cache) => cache.hex_to_rgb(hex)?,
            None => hex.parse()?,
        };
        Ok(rgb)
    }

    /// Find the single best dye for a hex color.
    ///
    /// Dyes whose ids appear in `exclude` are skipped. Returns `Ok(None)`
    /// when every matchable dye is excluded; "no match" is not an error.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidColor`] for malformed hex input;
    /// [`QueryError::NotReady`] when the catalog has no matchable dyes.
    pub fn nearest(
        &self,
        hex: &str,
        exclude: &[u32],
        metric: DistanceMetric,
    ) -> Result<Option<MatchHit>, QueryError> {
        let rgb = self.parse_hex(hex)?;
        let exclude: HashSet<u32> = exclude.iter().copied().collect();
        self.nearest_rgb(rgb, &exclude, metric)
    }

    /// [`nearest`](Self::nearest) over an already-parsed color.
    pub fn nearest_rgb(
        &self,
        rgb: Rgb,
        exclude: &HashSet<u32>,
        metric: DistanceMetric,
    ) -> Result<Option<MatchHit>, QueryError> {
        self.check_ready()?;

        if metric.is_euclidean_rgb() {
            let hit = self.tree.nearest(rgb_point(rgb), exclude).map(|(slot, d2)| {
                MatchHit {
                    dye: self.catalog.slot(slot).clone(),
                    distance: (d2 as f64).sqrt(),
                }
            });
            return Ok(hit);
        }

        // Perceptual metric: rescore every candidate exactly
        let mut best: Option<(usize, f64)> = None;
        for &slot in &self.matchable {
            let dye = self.catalog.slot(slot);
            if exclude.contains(&dye.id()) {
                continue;
            }
            let d = metric.evaluate(rgb, dye.rgb());
            let better = match best {
                None => true,
                Some((_, best_d)) => d < best_d,
            };
            if better {
                best = Some((slot, d));
            }
        }
        Ok(best.map(|(slot, distance)| MatchHit {
            dye: self.catalog.slot(slot).clone(),
            distance,
        }))
    }

    /// All dyes within `max_distance` of a hex color, sorted ascending by
    /// distance and truncated to `limit` if set.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidColor`] for malformed hex input;
    /// [`QueryError::NotReady`] when the catalog has no matchable dyes.
    pub fn within(
        &self,
        hex: &str,
        max_distance: f64,
        limit: Option<usize>,
        metric: DistanceMetric,
    ) -> Result<Vec<MatchHit>, QueryError> {
        let rgb = self.parse_hex(hex)?;
        self.check_ready()?;

        if metric.is_euclidean_rgb() {
            let hits = self
                .tree
                .range(rgb_point(rgb), max_distance, limit)
                .into_iter()
                .map(|(slot, distance)| MatchHit {
                    dye: self.catalog.slot(slot).clone(),
                    distance,
                })
                .collect();
            return Ok(hits);
        }

        let mut scored: Vec<(usize, f64)> = self
            .matchable
            .iter()
            .map(|&slot| (slot, metric.evaluate(rgb, self.catalog.slot(slot).rgb())))
            .filter(|(_, d)| *d <= max_distance)
            .collect();
        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        if let Some(limit) = limit {
            scored.truncate(limit);
        }
        Ok(scored
            .into_iter()
            .map(|(slot, distance)| MatchHit {
                dye: self.catalog.slot(slot).clone(),
                distance,
            })
            .collect())
    }

    fn check_ready(&self) -> Result<(), QueryError> {
        if self.matchable.is_empty() {
            Err(QueryError::NotReady)
        } else {
            Ok(())
        }
    }
}

#[inline]
fn rgb_point(rgb: Rgb) -> [i64; 3] {
    [rgb.r as i64, rgb.g as i64, rgb.b as i64]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorError;

    fn test_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![
                Dye::new(1, "Crimson", "Red", Rgb::new(255, 87, 51)),
                Dye::new(2, "Leaf", "Green", Rgb::new(40, 180, 70)),
                Dye::new(3, "Sea", "Blue", Rgb::new(30, 90, 200)),
                Dye::new(4, "Coal", "Black", Rgb::new(20, 20, 20)),
                Dye::new(5, "Mask", "Facewear", Rgb::new(255, 87, 51)),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn exact_match_has_zero_distance() {
        let matcher = Matcher::new(test_catalog());
        let hit = matcher
            .nearest("#FF5733", &[], DistanceMetric::Rgb)
            .unwrap()
            .unwrap();
        assert_eq!(hit.dye.id(), 1);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn facewear_is_never_matched() {
        // Dye 5 shares dye 1's color; with 1 excluded the match must skip
        // the Facewear twin and land elsewhere
        let matcher = Matcher::new(test_catalog());
        let hit = matcher
            .nearest("#FF5733", &[1], DistanceMetric::Rgb)
            .unwrap()
            .unwrap();
        assert_ne!(hit.dye.id(), 5);
        assert!(hit.distance > 0.0);
    }

    #[test]
    fn invalid_hex_is_an_error_not_empty() {
        let matcher = Matcher::new(test_catalog());
        let err = matcher
            .nearest("#NOPE", &[], DistanceMetric::Rgb)
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidColor(ColorError::InvalidHexDigit { .. })
        ));
    }

    #[test]
    fn excluding_all_yields_none() {
        let matcher = Matcher::new(test_catalog());
        let result = matcher
            .nearest("#FF5733", &[1, 2, 3, 4], DistanceMetric::Rgb)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn facewear_only_catalog_is_not_ready() {
        let catalog = Arc::new(
            Catalog::new(vec![Dye::new(1, "Mask", "Facewear", Rgb::new(0, 0, 0))]).unwrap(),
        );
        let matcher = Matcher::new(catalog);
        assert_eq!(
            matcher.nearest("#FF5733", &[], DistanceMetric::Rgb),
            Err(QueryError::NotReady)
        );
        assert_eq!(
            matcher.within("#FF5733", 100.0, None, DistanceMetric::Rgb),
            Err(QueryError::NotReady)
        );
    }

    #[test]
    fn within_is_sorted_and_limited() {
        let matcher = Matcher::new(test_catalog());
        let hits = matcher
            .within("#FF5733", f64::INFINITY, None, DistanceMetric::Rgb)
            .unwrap();
        assert_eq!(hits.len(), 4);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }

        let top2 = matcher
            .within("#FF5733", f64::INFINITY, Some(2), DistanceMetric::Rgb)
            .unwrap();
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].dye.id(), hits[0].dye.id());
    }

    #[test]
    fn within_respects_max_distance() {
        let matcher = Matcher::new(test_catalog());
        let hits = matcher
            .within("#FF5733", 10.0, None, DistanceMetric::Rgb)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].dye.id(), 1);
    }

    #[test]
    fn perceptual_metrics_agree_on_exact_match() {
        let matcher = Matcher::new(test_catalog());
        for metric in [
            DistanceMetric::Cie76,
            DistanceMetric::Cie2000,
            DistanceMetric::Oklab,
            DistanceMetric::hyab(),
            DistanceMetric::oklch_weighted(),
        ] {
            let hit = matcher.nearest("#FF5733", &[], metric).unwrap().unwrap();
            assert_eq!(hit.dye.id(), 1, "metric {metric} missed the exact match");
            assert!(hit.distance.abs() < 1e-9);
        }
    }

    #[test]
    fn perceptual_within_rescoring_sorts_by_metric() {
        let matcher = Matcher::new(test_catalog());
        let hits = matcher
            .within("#208040", f64::INFINITY, None, DistanceMetric::Cie2000)
            .unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].dye.id(), 2); // leaf green is perceptually closest
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn cached_and_uncached_parse_agree() {
        let cache = Arc::new(ConversionCache::new());
        let matcher = Matcher::new(test_catalog()).with_cache(Arc::clone(&cache));
        let a = matcher.nearest("#FF5733", &[], DistanceMetric::Rgb).unwrap();
        let b = matcher.nearest("#ff5733", &[], DistanceMetric::Rgb).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.stats().hex_to_rgb, 1);
    }
}
