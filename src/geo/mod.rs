//! Geographic layer system for map overlays.
//!
//! This module provides functionality for loading and rendering vector
//! features such as plate boundaries and earthquake markers, and the Web
//! Mercator projection the map canvas and tile layers share.

mod layer;
mod projection;
mod renderer;
mod style;

pub use layer::{GeoFeature, GeoLayer, MalformedGeoJson};
pub use projection::{MapProjection, TileCoord};
pub use renderer::{hit_test_marker, render_geo_layer, render_quake_layer};
pub use style::{parse_color, LayerStyle};
