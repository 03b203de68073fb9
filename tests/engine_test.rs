//! End-to-end tests: catalog JSON through the loader into the matching
//! and harmony engine, with localized names applied to the results.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::fixtures;
use dye_color::{DistanceMetric, HarmonyEngine, HarmonyKind, QueryError};
use dyematch::assets::AssetSource;
use dyematch::services::catalog_loader::find_dye;
use dyematch::services::{load_catalog, Locale, TranslationTable};

#[test]
fn exact_color_matches_its_dye() {
    let engine = fixtures::engine();
    let hit = engine
        .matcher()
        .nearest("#E01010", &[], DistanceMetric::Rgb)
        .unwrap()
        .unwrap();
    assert_eq!(hit.dye.id(), 101);
    assert_eq!(hit.distance, 0.0);
}

#[test]
fn facewear_twin_is_never_returned() {
    // Dye 900 shares dye 101's exact color but is Facewear; excluding 101
    // must fall through to a different dye, not the lens
    let engine = fixtures::engine();
    let hit = engine
        .matcher()
        .nearest("#E01010", &[101], DistanceMetric::Rgb)
        .unwrap()
        .unwrap();
    assert_ne!(hit.dye.id(), 900);
}

#[test]
fn within_returns_ordered_matches_for_each_metric() {
    let engine = fixtures::engine();
    for metric in [
        DistanceMetric::Rgb,
        DistanceMetric::Cie2000,
        DistanceMetric::Oklab,
    ] {
        let hits = engine
            .matcher()
            .within("#D02020", f64::INFINITY, Some(3), metric)
            .unwrap();
        assert_eq!(hits.len(), 3, "metric {metric}");
        assert_eq!(hits[0].dye.id(), 101, "metric {metric}");
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }
}

#[test]
fn triadic_harmony_spans_the_wheel() {
    let engine = fixtures::engine();
    let result = engine.harmony(HarmonyKind::Triadic, "#E01010").unwrap();

    let anchor = result.anchor.as_ref().unwrap();
    assert_eq!(anchor.id(), 101);
    assert_eq!(result.slots.len(), 2);

    // Companions are distinct, non-Facewear, and not the anchor
    for slot in &result.slots {
        assert_ne!(slot.dye.id(), anchor.id());
        assert!(!slot.dye.is_facewear());
    }
    assert_ne!(result.slots[0].dye.id(), result.slots[1].dye.id());
}

#[test]
fn localized_names_apply_with_fallbacks() {
    let engine = fixtures::engine();
    let names = fixtures::names();

    let red = engine.catalog().get(101).unwrap();
    let amber = engine.catalog().get(102).unwrap();
    let green = engine.catalog().get(103).unwrap();

    assert_eq!(names.display_name(red, Locale::Ja), "フレイムレッド");
    // Missing German cell falls back to English
    assert_eq!(names.display_name(amber, Locale::De), "Amber Yellow Dye");
    // Missing row falls back to the catalog name
    assert_eq!(names.display_name(green, Locale::De), "Verdant Green Dye");
}

#[test]
fn find_dye_resolves_cli_queries() {
    let engine = fixtures::engine();
    let catalog = engine.catalog();

    assert_eq!(find_dye(catalog, "105").unwrap().name(), "Abyss Blue Dye");
    assert_eq!(find_dye(catalog, "abyss").unwrap().id(), 105);
    assert!(find_dye(catalog, "dye").is_none()); // ambiguous
}

#[test]
fn invalid_hex_surfaces_as_invalid_color() {
    let engine = fixtures::engine();
    assert!(matches!(
        engine.matcher().nearest("#GGHHII", &[], DistanceMetric::Rgb),
        Err(QueryError::InvalidColor(_))
    ));
}

#[test]
fn facewear_only_catalog_reports_not_ready() {
    let json = r##"[{"itemID": 1, "name": "Lens", "category": "Facewear", "hex": "#808080"}]"##;
    let catalog = Arc::new(load_catalog(json).unwrap());
    let engine = HarmonyEngine::new(catalog);
    assert!(matches!(
        engine.matcher().nearest("#808080", &[], DistanceMetric::Rgb),
        Err(QueryError::NotReady)
    ));
}

#[test]
fn embedded_assets_build_a_working_engine() {
    // The shipped catalog and name table must load and answer queries
    let assets = AssetSource::default();
    let catalog = Arc::new(load_catalog(&assets.read_catalog().unwrap()).unwrap());
    let names = TranslationTable::from_csv(&assets.read_names().unwrap()).unwrap();

    assert!(catalog.len() >= 50);
    assert!(catalog.matchable_slots().len() < catalog.len()); // has facewear

    let engine = HarmonyEngine::new(Arc::clone(&catalog));

    // Dalamud Red matches itself
    let hit = engine
        .matcher()
        .nearest("#AB1B21", &[], DistanceMetric::Rgb)
        .unwrap()
        .unwrap();
    assert_eq!(hit.dye.name(), "Dalamud Red Dye");
    assert_eq!(
        names.display_name(&hit.dye, Locale::De),
        "Dalamud-Rot"
    );

    // Every harmony kind produces a result with no Facewear members
    for kind in HarmonyKind::ALL {
        let result = engine.harmony(kind, "#AB1B21").unwrap();
        assert!(result.anchor.is_some());
        for slot in &result.slots {
            assert!(!slot.dye.is_facewear());
        }
    }

    let mono = engine.monochromatic("#AB1B21", 4).unwrap();
    assert!(!mono.is_empty());
}
