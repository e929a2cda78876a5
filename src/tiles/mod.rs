//! Raster base layers.

mod cache;
mod source;

pub use cache::{TileCache, TileKey};
pub use source::TileSource;
