//! Embedded data files with optional external overrides.
//!
//! The dye catalog and the localized name table ship inside the binary;
//! a config entry can point either at a file on disk instead.

use rust_embed::RustEmbed;
use std::path::PathBuf;

use crate::error::AppError;
use crate::models::AppConfig;

#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.json"]
#[include = "*.csv"]
struct EmbeddedAssets;

const CATALOG_ASSET: &str = "dyes.json";
const NAMES_ASSET: &str = "dye_names.csv";

/// Resolves the catalog and name-table sources.
#[derive(Debug, Default)]
pub struct AssetSource {
    catalog_path: Option<PathBuf>,
    names_path: Option<PathBuf>,
}

impl AssetSource {
    /// Use explicit override paths (either may be `None`).
    pub fn new(catalog_path: Option<PathBuf>, names_path: Option<PathBuf>) -> Self {
        Self {
            catalog_path,
            names_path,
        }
    }

    /// Build from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.catalog_file.clone(), config.names_file.clone())
    }

    /// Read the dye catalog JSON, preferring the external override.
    pub fn read_catalog(&self) -> Result<String, AppError> {
        self.read(self.catalog_path.as_deref(), CATALOG_ASSET)
    }

    /// Read the localized name table CSV, preferring the external override.
    pub fn read_names(&self) -> Result<String, AppError> {
        self.read(self.names_path.as_deref(), NAMES_ASSET)
    }

    /// Human-readable source description for the status screen.
    pub fn catalog_source(&self) -> String {
        describe(self.catalog_path.as_deref())
    }

    /// Human-readable name-table source for the status screen.
    pub fn names_source(&self) -> String {
        describe(self.names_path.as_deref())
    }

    fn read(&self, external: Option<&std::path::Path>, asset: &str) -> Result<String, AppError> {
        if let Some(path) = external {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Reading external asset");
                return Ok(std::fs::read_to_string(path)?);
            }
            tracing::warn!(
                path = %path.display(),
                "Configured asset path not found, falling back to embedded"
            );
        }
        let file = EmbeddedAssets::get(asset)
            .ok_or_else(|| AppError::Asset(format!("embedded asset {asset} is missing")))?;
        String::from_utf8(file.data.into_owned())
            .map_err(|e| AppError::Asset(format!("embedded asset {asset} is not UTF-8: {e}")))
    }
}

fn describe(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) if p.exists() => p.display().to_string(),
        Some(_) => "embedded (configured file not found)".to_string(),
        None => "embedded".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_is_present_and_parseable() {
        let source = AssetSource::default();
        let json = source.read_catalog().unwrap();
        assert!(json.trim_start().starts_with('['));
        assert_eq!(source.catalog_source(), "embedded");
    }

    #[test]
    fn embedded_names_are_present() {
        let source = AssetSource::default();
        let csv = source.read_names().unwrap();
        assert!(csv.starts_with("itemID,"));
    }

    #[test]
    fn external_override_wins_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dyes.json");
        std::fs::write(&path, "[]").unwrap();

        let source = AssetSource::new(Some(path.clone()), None);
        assert_eq!(source.read_catalog().unwrap(), "[]");
        assert_eq!(source.catalog_source(), path.display().to_string());
    }

    #[test]
    fn missing_override_falls_back_to_embedded() {
        let source = AssetSource::new(Some(PathBuf::from("/nope/dyes.json")), None);
        let json = source.read_catalog().unwrap();
        assert!(json.trim_start().starts_with('['));
        assert!(source.catalog_source().contains("not found"));
    }
}
