//! dyematch - dye matching and color harmony toolkit.
//!
//! Matches arbitrary input colors against the in-game dye catalog and
//! derives hue-wheel harmony sets. The algorithmic core lives in the
//! `dye-color` crate; this crate adds the catalog loader, localized name
//! lookup, market price fetching, palette extraction, and the CLI surface.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod services;
