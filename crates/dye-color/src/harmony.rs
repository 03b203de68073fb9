//! Hue-wheel harmony derivation over the dye catalog.
//!
//! Each harmony kind is a fixed list of hue offsets from an anchor dye,
//! with a default angular tolerance. The anchor resolves through the
//! matcher; companions resolve through the hue bucket index.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::cache::ConversionCache;
use crate::catalog::{Catalog, Dye};
use crate::color::{hue_distance, normalize_hue};
use crate::error::QueryError;
use crate::index::HueIndex;
use crate::matcher::Matcher;
use crate::metric::DistanceMetric;

/// Default analogous offset angle, in degrees.
pub const DEFAULT_ANALOGOUS_ANGLE: f64 = 30.0;

/// Hue span searched on each side of the anchor by
/// [`HarmonyEngine::monochromatic`].
pub const MONOCHROMATIC_SPAN: f64 = 15.0;

/// A color-harmony scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmonyKind {
    /// The single dye nearest the anchor's RGB inverse
    Complementary,
    /// Neighbours at ±30° (or a caller-chosen angle)
    Analogous,
    /// 120° and 240°, the balanced triangle
    Triadic,
    /// 90°, 180°, and 270°
    Square,
    /// 60°, 180°, and 240°
    Tetradic,
    /// 150° and 210°, the softened complement
    SplitComplementary,
    /// 30°, −30°, and 180°
    Compound,
    /// Close neighbours at ±15° with a tight tolerance
    Shades,
}

impl HarmonyKind {
    /// Every harmony kind, for CLI listings.
    pub const ALL: [HarmonyKind; 8] = [
        Self::Complementary,
        Self::Analogous,
        Self::Triadic,
        Self::Square,
        Self::Tetradic,
        Self::SplitComplementary,
        Self::Compound,
        Self::Shades,
    ];

    /// Hue offsets from the anchor, in degrees.
    ///
    /// Complementary returns an empty slice: it resolves through RGB
    /// inversion rather than a hue offset.
    pub fn offsets(self) -> &'static [f64] {
        match self {
            Self::Complementary => &[],
            Self::Analogous => &[DEFAULT_ANALOGOUS_ANGLE, -DEFAULT_ANALOGOUS_ANGLE],
            Self::Triadic => &[120.0, 240.0],
            Self::Square => &[90.0, 180.0, 270.0],
            Self::Tetradic => &[60.0, 180.0, 240.0],
            Self::SplitComplementary => &[150.0, 210.0],
            Self::Compound => &[30.0, -30.0, 180.0],
            Self::Shades => &[15.0, -15.0],
        }
    }

    /// Default angular tolerance for this kind, in degrees.
    pub fn tolerance(self) -> f64 {
        match self {
            Self::Complementary => 0.0,
            Self::Compound => 35.0,
            Self::Shades => 5.0,
            _ => 45.0,
        }
    }

    /// Parse a harmony kind from its CLI name.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "complementary" => Some(Self::Complementary),
            "analogous" => Some(Self::Analogous),
            "triadic" => Some(Self::Triadic),
            "square" => Some(Self::Square),
            "tetradic" => Some(Self::Tetradic),
            "split-complementary" | "split" => Some(Self::SplitComplementary),
            "compound" => Some(Self::Compound),
            "shades" => Some(Self::Shades),
            _ => None,
        }
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complementary => f.write_str("complementary"),
            Self::Analogous => f.write_str("analogous"),
            Self::Triadic => f.write_str("triadic"),
            Self::Square => f.write_str("square"),
            Self::Tetradic => f.write_str("tetradic"),
            Self::SplitComplementary => f.write_str("split-complementary"),
            Self::Compound => f.write_str("compound"),
            Self::Shades => f.write_str("shades"),
        }
    }
}

/// One resolved companion in a harmony result.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonySlot {
    /// The selected dye
    pub dye: Dye,
    /// The hue this slot aimed for
    pub target_hue: f64,
    /// The offset that produced `target_hue`; `None` for complementary
    pub offset: Option<f64>,
    /// True when no dye fell within tolerance and the globally
    /// closest-hue candidate was used instead
    pub fallback: bool,
}

/// The outcome of a harmony derivation.
///
/// `slots` may be shorter than the kind's offset list: an offset is
/// omitted when every dye is already used in this result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarmonyResult {
    /// The anchor dye the scheme was derived from, if one resolved
    pub anchor: Option<Dye>,
    /// Companions in offset order
    pub slots: Vec<HarmonySlot>,
}

impl HarmonyResult {
    /// True when no anchor resolved.
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none()
    }

    /// The companion dyes in offset order.
    pub fn dyes(&self) -> impl Iterator<Item = &Dye> {
        self.slots.iter().map(|s| &s.dye)
    }
}

/// Harmony derivation engine: a [`Matcher`] for anchors plus a
/// [`HueIndex`] for companion lookups.
///
/// # Example
///
/// ```
/// use dye_color::{Catalog, Dye, HarmonyEngine, HarmonyKind, Rgb};
/// use std::sync::Arc;
///
/// let catalog = Arc::new(
///     Catalog::new(vec![
///         Dye::new(1, "Red", "Red", Rgb::new(230, 30, 30)),
///         Dye::new(2, "Green", "Green", Rgb::new(30, 230, 30)),
///         Dye::new(3, "Blue", "Blue", Rgb::new(30, 30, 230)),
///     ])
///     .unwrap(),
/// );
///
/// let engine = HarmonyEngine::new(catalog);
/// let result = engine.harmony(HarmonyKind::Triadic, "#E61E1E").unwrap();
/// assert_eq!(result.anchor.as_ref().unwrap().id(), 1);
/// assert_eq!(result.slots.len(), 2);
/// ```
#[derive(Debug)]
pub struct HarmonyEngine {
    matcher: Matcher,
    hue_index: HueIndex,
}

impl HarmonyEngine {
    /// Build the engine, constructing both indices from the catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let hue_index = HueIndex::new(&catalog);
        Self {
            matcher: Matcher::new(catalog),
            hue_index,
        }
    }

    /// Serve conversions through a shared cache.
    pub fn with_cache(mut self, cache: Arc<ConversionCache>) -> Self {
        self.matcher = self.matcher.with_cache(cache);
        self
    }

    /// The matcher used for anchor resolution.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        self.matcher.catalog()
    }

    /// Derive a harmony set with the default anchor metric (RGB).
    pub fn harmony(&self, kind: HarmonyKind, hex: &str) -> Result<HarmonyResult, QueryError> {
        self.harmony_with(kind, hex, DistanceMetric::default())
    }

    /// Derive a harmony set, resolving the anchor under `metric`.
    pub fn harmony_with(
        &self,
        kind: HarmonyKind,
        hex: &str,
        metric: DistanceMetric,
    ) -> Result<HarmonyResult, QueryError> {
        if kind == HarmonyKind::Complementary {
            return self.complementary(hex, metric);
        }
        self.offsets_harmony(hex, metric, kind.offsets(), kind.tolerance())
    }

    /// Analogous harmony with a caller-chosen offset angle.
    pub fn analogous(&self, hex: &str, angle: f64) -> Result<HarmonyResult, QueryError> {
        self.offsets_harmony(
            hex,
            DistanceMetric::default(),
            &[angle, -angle],
            HarmonyKind::Analogous.tolerance(),
        )
    }

    /// Tonal variants of the anchor: dyes within ±15° of the anchor hue,
    /// ranked by `|Δsaturation| + |Δvalue|` descending (favoring tonal
    /// variety over near-duplicates), truncated to `limit`.
    pub fn monochromatic(&self, hex: &str, limit: usize) -> Result<Vec<Dye>, QueryError> {
        let anchor = match self.resolve_anchor(hex, DistanceMetric::default())? {
            Some(anchor) => anchor,
            None => return Ok(Vec::new()),
        };
        let anchor_hsv = anchor.hsv();

        let mut candidates: Vec<(f64, usize)> = Vec::new();
        for bucket in HueIndex::buckets_to_search(anchor_hsv.h, MONOCHROMATIC_SPAN) {
            for &slot in self.hue_index.dyes_in_bucket(bucket) {
                let dye = self.catalog().slot(slot);
                if dye.id() == anchor.id() {
                    continue;
                }
                if hue_distance(dye.hsv().h, anchor_hsv.h) > MONOCHROMATIC_SPAN {
                    continue;
                }
                let spread =
                    (dye.hsv().s - anchor_hsv.s).abs() + (dye.hsv().v - anchor_hsv.v).abs();
                candidates.push((spread, slot));
            }
        }

        // Most tonal variety first; ties keep catalog order
        candidates.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        candidates.truncate(limit);
        Ok(candidates
            .into_iter()
            .map(|(_, slot)| self.catalog().slot(slot).clone())
            .collect())
    }

    /// Complementary: invert the anchor's RGB, then match the result.
    fn complementary(
        &self,
        hex: &str,
        metric: DistanceMetric,
    ) -> Result<HarmonyResult, QueryError> {
        let anchor = match self.resolve_anchor(hex, metric)? {
            Some(anchor) => anchor,
            None => return Ok(HarmonyResult::default()),
        };

        let inverse = anchor.rgb().invert();
        let mut exclude = HashSet::new();
        exclude.insert(anchor.id());

        let slots = self
            .matcher
            .nearest_rgb(inverse, &exclude, metric)?
            .map(|hit| {
                vec![HarmonySlot {
                    target_hue: hit.dye.hsv().h,
                    dye: hit.dye,
                    offset: None,
                    fallback: false,
                }]
            })
            .unwrap_or_default();

        Ok(HarmonyResult {
            anchor: Some(anchor),
            slots,
        })
    }

    fn offsets_harmony(
        &self,
        hex: &str,
        metric: DistanceMetric,
        offsets: &[f64],
        tolerance: f64,
    ) -> Result<HarmonyResult, QueryError> {
        let anchor = match self.resolve_anchor(hex, metric)? {
            Some(anchor) => anchor,
            None => return Ok(HarmonyResult::default()),
        };

        let anchor_hue = anchor.hsv().h;
        let mut used = HashSet::new();
        used.insert(anchor.id());

        let mut slots = Vec::with_capacity(offsets.len());
        for &offset in offsets {
            let target_hue = normalize_hue(anchor_hue + offset);
            // An offset with no pickable dye is omitted; the result may be
            // shorter than the offset list
            if let Some((dye, fallback)) = self.pick_for_offset(target_hue, tolerance, &mut used) {
                slots.push(HarmonySlot {
                    dye,
                    target_hue,
                    offset: Some(offset),
                    fallback,
                });
            }
        }

        Ok(HarmonyResult {
            anchor: Some(anchor),
            slots,
        })
    }

    /// Select the closest-hue unused dye for one offset slot.
    ///
    /// Searches within `tolerance` of `target_hue` first. When nothing
    /// unused falls inside the tolerance, the globally closest-hue unused
    /// dye is chosen instead of returning nothing; this compensates for
    /// sparse regions of the catalog's hue wheel and is worth revisiting
    /// if the catalog ever becomes dense enough to drop it. Returns `None`
    /// only when every indexed dye is already used.
    fn pick_for_offset(
        &self,
        target_hue: f64,
        tolerance: f64,
        used: &mut HashSet<u32>,
    ) -> Option<(Dye, bool)> {
        let mut best: Option<(f64, usize)> = None;
        for bucket in HueIndex::buckets_to_search(target_hue, tolerance) {
            for &slot in self.hue_index.dyes_in_bucket(bucket) {
                let dye = self.catalog().slot(slot);
                if used.contains(&dye.id()) {
                    continue;
                }
                let hd = hue_distance(dye.hsv().h, target_hue);
                if hd > tolerance {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((best_hd, best_slot)) => {
                        hd < best_hd || (hd == best_hd && slot < best_slot)
                    }
                };
                if better {
                    best = Some((hd, slot));
                }
            }
        }

        if let Some((_, slot)) = best {
            let dye = self.catalog().slot(slot).clone();
            used.insert(dye.id());
            return Some((dye, false));
        }

        // Fallback: closest hue anywhere on the wheel
        let mut best: Option<(f64, usize)> = None;
        for &slot in self.matcher.matchable_slots() {
            let dye = self.catalog().slot(slot);
            if used.contains(&dye.id()) {
                continue;
            }
            let hd = hue_distance(dye.hsv().h, target_hue);
            let better = match best {
                None => true,
                Some((best_hd, best_slot)) => hd < best_hd || (hd == best_hd && slot < best_slot),
            };
            if better {
                best = Some((hd, slot));
            }
        }
        best.map(|(_, slot)| {
            let dye = self.catalog().slot(slot).clone();
            used.insert(dye.id());
            (dye, true)
        })
    }

    fn resolve_anchor(
        &self,
        hex: &str,
        metric: DistanceMetric,
    ) -> Result<Option<Dye>, QueryError> {
        Ok(self
            .matcher
            .nearest(hex, &[], metric)?
            .map(|hit| hit.dye))
    }
}
