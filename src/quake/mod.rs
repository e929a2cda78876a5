//! Earthquake feed handling.
//!
//! Parses the live feed, classifies events by depth, and turns them into
//! circle markers with popups.

mod classify;
mod feature;
mod marker;

pub use classify::DepthScale;
pub use feature::parse_feed;
#[cfg(test)]
pub use feature::EarthquakeFeature;
pub use marker::{EarthquakeLayer, MarkerStyle, PopupContent, QuakeMarker};
