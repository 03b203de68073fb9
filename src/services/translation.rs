//! Localized dye name lookup.
//!
//! The name table is a CSV generated from the game's item sheets with one
//! row per dye: `itemID, English Name, Japanese Name, German Name, French
//! Name`. Lookup is pure in-memory after load; missing cells fall back to
//! English and then to the catalog display name.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use dye_color::Dye;

/// A supported client language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    En,
    Ja,
    De,
    Fr,
}

impl Locale {
    /// Every supported locale, in table column order.
    pub const ALL: [Locale; 4] = [Self::En, Self::Ja, Self::De, Self::Fr];

    /// Parse a locale code.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ja" => Some(Self::Ja),
            "de" => Some(Self::De),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    fn column(self) -> usize {
        match self {
            Self::En => 0,
            Self::Ja => 1,
            Self::De => 2,
            Self::Fr => 3,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Ja => f.write_str("ja"),
            Self::De => f.write_str("de"),
            Self::Fr => f.write_str("fr"),
        }
    }
}

/// Error while parsing the name table.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("name table row {row}: expected 5 columns, found {found}")]
    MalformedRow { row: usize, found: usize },

    #[error("name table row {row}: invalid item id {value:?}")]
    BadItemId { row: usize, value: String },
}

/// In-memory multilingual name table.
#[derive(Debug, Default)]
pub struct TranslationTable {
    names: HashMap<u32, [Option<String>; 4]>,
}

impl TranslationTable {
    /// Parse the CSV name table.
    ///
    /// The first line is a header and is skipped; blank lines are
    /// tolerated; empty cells become missing translations.
    pub fn from_csv(text: &str) -> Result<Self, TranslationError> {
        let mut names = HashMap::new();

        for (row, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split(',').collect();
            if cells.len() < 5 {
                return Err(TranslationError::MalformedRow {
                    row,
                    found: cells.len(),
                });
            }
            let id: u32 = cells[0]
                .trim()
                .parse()
                .map_err(|_| TranslationError::BadItemId {
                    row,
                    value: cells[0].to_string(),
                })?;

            let mut entry: [Option<String>; 4] = Default::default();
            for (i, slot) in entry.iter_mut().enumerate() {
                let cell = cells[i + 1].trim();
                if !cell.is_empty() {
                    *slot = Some(cell.to_string());
                }
            }
            names.insert(id, entry);
        }

        Ok(Self { names })
    }

    /// Number of dyes with at least one translated name.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The raw translated name for a dye id, if present.
    pub fn name(&self, id: u32, locale: Locale) -> Option<&str> {
        self.names
            .get(&id)
            .and_then(|entry| entry[locale.column()].as_deref())
    }

    /// Display name for a dye: requested locale, then English, then the
    /// catalog name.
    pub fn display_name(&self, dye: &Dye, locale: Locale) -> String {
        self.name(dye.id(), locale)
            .or_else(|| self.name(dye.id(), Locale::En))
            .unwrap_or(dye.name())
            .to_string()
    }
}
