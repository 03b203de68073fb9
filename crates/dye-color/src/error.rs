//! Error types for color parsing and engine queries.
//!
//! Malformed input (bad hex, out-of-range components) is always a caller
//! error and surfaces as [`ColorError`]. "No dye matched" is never an error;
//! queries return empty results instead.

use std::fmt;

/// Error for malformed color input.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    /// Hex string has invalid length (must be 3 or 6 digits after stripping `#`)
    InvalidHexLength {
        /// Number of characters found
        length: usize,
    },
    /// Invalid hexadecimal character encountered
    InvalidHexDigit {
        /// The offending character
        digit: char,
    },
    /// A color component is outside its valid range
    ComponentOutOfRange {
        /// Component name, e.g. `"saturation"`
        component: &'static str,
        /// The offending value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// A floating-point component is NaN or infinite
    NonFinite {
        /// Component name, e.g. `"hue"`
        component: &'static str,
    },
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHexLength { length } => {
                write!(
                    f,
                    "invalid hex color length: {} digits (expected 3 or 6)",
                    length
                )
            }
            ColorError::InvalidHexDigit { digit } => {
                write!(f, "invalid hex character {:?}", digit)
            }
            ColorError::ComponentOutOfRange {
                component,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "{} {} is outside the valid range {}..={}",
                    component, value, min, max
                )
            }
            ColorError::NonFinite { component } => {
                write!(f, "{} must be a finite number", component)
            }
        }
    }
}

impl std::error::Error for ColorError {}

/// Error for matcher and harmony queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Input color was malformed
    InvalidColor(ColorError),
    /// The engine has no matchable dyes (e.g. the catalog holds only
    /// Facewear entries, which are excluded from the indices)
    NotReady,
}

impl From<ColorError> for QueryError {
    fn from(err: ColorError) -> Self {
        QueryError::InvalidColor(err)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidColor(err) => write!(f, "invalid color: {}", err),
            QueryError::NotReady => write!(f, "no matchable dyes are indexed"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::InvalidColor(err) => Some(err),
            QueryError::NotReady => None,
        }
    }
}
