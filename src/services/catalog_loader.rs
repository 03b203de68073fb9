//! Dye catalog loading and normalization.
//!
//! Parses the catalog JSON into the core's frozen [`Catalog`] snapshot.
//! Loading happens exactly once at startup; the engine never re-reads the
//! source afterward.

use serde::Deserialize;
use thiserror::Error;

use dye_color::{Catalog, CatalogError, ColorError, Dye, Rgb};

/// One record of the catalog data file.
///
/// `vendor_price` is acquisition metadata carried by the file for other
/// tooling; the matching engine ignores it.
#[derive(Debug, Deserialize)]
struct DyeRecord {
    #[serde(rename = "itemID")]
    item_id: u32,
    name: String,
    category: String,
    hex: String,
    #[serde(default)]
    #[allow(dead_code)]
    vendor_price: Option<u32>,
}

/// Error while loading the catalog data file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dye {name:?} (item {item_id}): {source}")]
    InvalidColor {
        name: String,
        item_id: u32,
        source: ColorError,
    },

    #[error("invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Parse catalog JSON into a validated [`Catalog`].
///
/// Records keep their file order; hex colors are parsed strictly and a
/// malformed record names itself in the error.
pub fn load_catalog(json: &str) -> Result<Catalog, CatalogLoadError> {
    let records: Vec<DyeRecord> = serde_json::from_str(json)?;

    let mut dyes = Vec::with_capacity(records.len());
    for record in records {
        let rgb: Rgb = record
            .hex
            .parse()
            .map_err(|source| CatalogLoadError::InvalidColor {
                name: record.name.clone(),
                item_id: record.item_id,
                source,
            })?;
        dyes.push(Dye::new(record.item_id, record.name, record.category, rgb));
    }

    let catalog = Catalog::new(dyes)?;
    tracing::info!(
        dyes = catalog.len(),
        matchable = catalog.matchable_slots().len(),
        "Loaded dye catalog"
    );
    Ok(catalog)
}

/// Find a dye by CLI argument: a numeric item id, an exact name, or a
/// unique case-insensitive name fragment.
pub fn find_dye<'a>(catalog: &'a Catalog, query: &str) -> Option<&'a Dye> {
    if let Ok(id) = query.parse::<u32>() {
        return catalog.get(id);
    }

    let lowered = query.to_lowercase();
    if let Some(exact) = catalog
        .dyes()
        .iter()
        .find(|d| d.name().eq_ignore_ascii_case(query))
    {
        return Some(exact);
    }

    let mut matches = catalog
        .dyes()
        .iter()
        .filter(|d| d.name().to_lowercase().contains(&lowered));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
