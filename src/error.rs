use thiserror::Error;

use crate::services::catalog_loader::CatalogLoadError;
use crate::services::price_service::PriceError;
use crate::services::translation::TranslationError;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("asset error: {0}")]
    Asset(String),

    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("invalid color: {0}")]
    Color(#[from] dye_color::ColorError),

    #[error("{0}")]
    Query(#[from] dye_color::QueryError),

    #[error("PNG decode error: {0}")]
    Image(#[from] png::DecodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no dye matches {0:?}")]
    UnknownDye(String),

    #[error("unknown metric {0:?} (expected rgb, cie76, cie2000, oklab, hyab, or oklch-weighted)")]
    UnknownMetric(String),

    #[error("unknown harmony kind {0:?}")]
    UnknownHarmony(String),

    #[error("unknown locale {0:?} (expected en, ja, de, or fr)")]
    UnknownLocale(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_input() {
        let err = AppError::UnknownDye("nonexistent".to_string());
        assert_eq!(err.to_string(), "no dye matches \"nonexistent\"");

        let err = AppError::UnknownMetric("manhattan".to_string());
        assert!(err.to_string().contains("manhattan"));
        assert!(err.to_string().contains("cie2000"));
    }

    #[test]
    fn color_errors_convert() {
        let parse_err = "#XYZ".parse::<dye_color::Rgb>().unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Color(_)));
    }
}
