//! dye-color: color conversion, perceptual distance, and dye matching.
//!
//! This crate is the algorithmic core of the dye toolkit. It matches an
//! arbitrary input color to the closest member of a fixed dye catalog and
//! derives color-harmony sets (triadic, complementary, analogous, ...)
//! from hue-wheel geometry.
//!
//! # Quick Start
//!
//! ```
//! use dye_color::{Catalog, Dye, HarmonyEngine, HarmonyKind, Rgb};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(
//!     Catalog::new(vec![
//!         Dye::new(1, "Dalamud Red", "Red", Rgb::new(171, 27, 33)),
//!         Dye::new(2, "Celeste Green", "Green", Rgb::new(130, 196, 160)),
//!         Dye::new(3, "Ceruleum Blue", "Blue", Rgb::new(65, 110, 170)),
//!     ])
//!     .unwrap(),
//! );
//!
//! let engine = HarmonyEngine::new(catalog);
//!
//! // Nearest dye to an arbitrary color
//! let hit = engine
//!     .matcher()
//!     .nearest("#AA1A20", &[], Default::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(hit.dye.name(), "Dalamud Red");
//!
//! // Harmony companions for the same color
//! let triad = engine.harmony(HarmonyKind::Triadic, "#AA1A20").unwrap();
//! assert_eq!(triad.anchor.unwrap().name(), "Dalamud Red");
//! ```
//!
//! # Architecture
//!
//! Data flows one way: the catalog is loaded once, both indices are built
//! from that frozen snapshot, and queries flow through [`Matcher`] and
//! [`HarmonyEngine`]. The catalog and indices are immutable after
//! construction and freely shareable across threads; the only mutable
//! shared state is [`ConversionCache`], which guards each per-function
//! cache with its own mutex.
//!
//! - [`color`]: pure, stateless conversions between RGB, HSV, HSL, LAB,
//!   LCH, OKLab, and OKLCH
//! - [`metric`]: selectable perceptual distance formulas behind one
//!   closed enum
//! - [`cache`]: bounded strict-LRU memoization for the hot conversions
//! - [`index`]: the k-d tree and hue bucket indices
//! - [`Matcher`] / [`HarmonyEngine`]: the query surface

pub mod cache;
pub mod catalog;
pub mod color;
pub mod error;
pub mod harmony;
pub mod index;
pub mod matcher;
pub mod metric;


pub use cache::{CacheStats, ConversionCache, DEFAULT_CACHE_CAPACITY};
pub use catalog::{Catalog, CatalogError, Dye, FACEWEAR_CATEGORY};
pub use color::{hue_distance, normalize_hue, Hsl, Hsv, Lab, Lch, Oklab, Oklch, Rgb};
pub use error::{ColorError, QueryError};
pub use harmony::{HarmonyEngine, HarmonyKind, HarmonyResult, HarmonySlot};
pub use index::{HueIndex, KdTree};
pub use matcher::{MatchHit, Matcher};
pub use metric::{ciede2000, DistanceMetric};
