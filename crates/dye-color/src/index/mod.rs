//! Read-only query indices built from the catalog snapshot.

mod hue;
mod kdtree;

pub use hue::{HueIndex, BUCKET_COUNT, BUCKET_WIDTH};
pub use kdtree::{KdEntry, KdTree};
