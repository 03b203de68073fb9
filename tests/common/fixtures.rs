//! Test fixtures: a small catalog and name table shared by the
//! integration tests.

use std::sync::Arc;

use dye_color::HarmonyEngine;
use dyematch::services::{load_catalog, TranslationTable};

/// Six matchable dyes spread over the hue wheel, plus one Facewear entry.
pub const CATALOG_JSON: &str = r##"[
    {"itemID": 101, "name": "Flame Red Dye", "category": "Red", "hex": "#E01010"},
    {"itemID": 102, "name": "Amber Yellow Dye", "category": "Yellow", "hex": "#E0B010", "vendor_price": 216},
    {"itemID": 103, "name": "Verdant Green Dye", "category": "Green", "hex": "#10E048"},
    {"itemID": 104, "name": "Deep Cyan Dye", "category": "Blue", "hex": "#10C8E0"},
    {"itemID": 105, "name": "Abyss Blue Dye", "category": "Blue", "hex": "#1030E0"},
    {"itemID": 106, "name": "Royal Violet Dye", "category": "Purple", "hex": "#9010E0"},
    {"itemID": 900, "name": "Tinted Lens", "category": "Facewear", "hex": "#E01010"}
]"##;

/// Name rows for part of the fixture catalog; dye 103+ has no row so the
/// fallback path stays covered.
pub const NAMES_CSV: &str = "\
itemID,English Name,Japanese Name,German Name,French Name
101,Flame Red Dye,フレイムレッド,Flammenrot,Teinture rouge flamme
102,Amber Yellow Dye,アンバーイエロー,,Teinture jaune ambre
";

/// Engine over the fixture catalog.
pub fn engine() -> HarmonyEngine {
    let catalog = Arc::new(load_catalog(CATALOG_JSON).expect("fixture catalog loads"));
    HarmonyEngine::new(catalog)
}

/// Name table over the fixture CSV.
pub fn names() -> TranslationTable {
    TranslationTable::from_csv(NAMES_CSV).expect("fixture names load")
}
