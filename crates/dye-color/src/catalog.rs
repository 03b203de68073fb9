//! The frozen dye catalog.
//!
//! A [`Catalog`] is loaded once and never mutated; every index is built from
//! this snapshot. Derived representations (HSV) are computed at construction
//! so per-query work never re-converts catalog entries.

use std::collections::HashSet;
use std::fmt;

use crate::color::{Hsv, Rgb};

/// Category tag marking cosmetic-only entries.
///
/// Facewear dyes colour accessories, not gear surfaces, so they are not
/// valid matching or harmony partners and are excluded from every index.
pub const FACEWEAR_CATEGORY: &str = "Facewear";

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Dye {
    id: u32,
    name: String,
    category: String,
    rgb: Rgb,
    hsv: Hsv,
    facewear: bool,
}

impl Dye {
    /// Create a dye, deriving its HSV form and Facewear classification.
    pub fn new(id: u32, name: impl Into<String>, category: impl Into<String>, rgb: Rgb) -> Self {
        let category = category.into();
        let facewear = category.eq_ignore_ascii_case(FACEWEAR_CATEGORY);
        Self {
            id,
            name: name.into(),
            hsv: Hsv::from(rgb),
            rgb,
            category,
            facewear,
        }
    }

    /// Catalog identifier (the in-game item id).
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category tag, e.g. `"Red"` or `"Facewear"`.
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The dye's RGB color.
    #[inline]
    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// The dye's derived HSV form.
    #[inline]
    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// True for cosmetic-only entries excluded from matching and harmony.
    #[inline]
    pub fn is_facewear(&self) -> bool {
        self.facewear
    }

    /// Canonical `#RRGGBB` hex form.
    pub fn hex(&self) -> String {
        self.rgb.to_string()
    }
}

impl fmt::Display for Dye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.rgb)
    }
}

/// Error for catalog construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No dyes provided
    Empty,
    /// Two entries share an id
    DuplicateId {
        /// The repeated id
        id: u32,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "catalog cannot be empty"),
            CatalogError::DuplicateId { id } => {
                write!(f, "duplicate dye id {} in catalog", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// The immutable, validated dye catalog.
///
/// # Example
///
/// ```
/// use dye_color::{Catalog, Dye, Rgb};
///
/// let catalog = Catalog::new(vec![
///     Dye::new(1, "Soot Black", "Black", Rgb::new(40, 38, 36)),
///     Dye::new(2, "Snow White", "White", Rgb::new(228, 226, 218)),
/// ])
/// .unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.get(2).unwrap().name(), "Snow White");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    dyes: Vec<Dye>,
}

impl Catalog {
    /// Build a catalog from an ordered list of dyes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::DuplicateId`] when two entries share an id.
    pub fn new(dyes: Vec<Dye>) -> Result<Self, CatalogError> {
        if dyes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for dye in &dyes {
            if !seen.insert(dye.id) {
                return Err(CatalogError::DuplicateId { id: dye.id });
            }
        }
        Ok(Self { dyes })
    }

    /// Number of entries, Facewear included.
    #[inline]
    pub fn len(&self) -> usize {
        self.dyes.len()
    }

    /// Always false: empty catalogs are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dyes.is_empty()
    }

    /// All entries in load order.
    #[inline]
    pub fn dyes(&self) -> &[Dye] {
        &self.dyes
    }

    /// Entry at a catalog slot (load-order position).
    #[inline]
    pub fn slot(&self, index: usize) -> &Dye {
        &self.dyes[index]
    }

    /// Look up a dye by id.
    pub fn get(&self, id: u32) -> Option<&Dye> {
        self.dyes.iter().find(|d| d.id() == id)
    }

    /// Slots of the entries that participate in matching and harmony,
    /// i.e. everything except Facewear.
    pub fn matchable_slots(&self) -> Vec<usize> {
        self.dyes
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_facewear())
            .map(|(i, _)| i)
            .collect()
    }
}
