pub mod catalog_loader;
pub mod palette_extractor;
pub mod price_service;
pub mod translation;

pub use catalog_loader::load_catalog;
pub use palette_extractor::{decode_png_pixels, extract_palette, ExtractedColor};
pub use price_service::{PriceQuote, PriceService};
pub use translation::{Locale, TranslationTable};
