//! Earthquake feed parsing.
//!
//! The feed is a GeoJSON FeatureCollection of Point features whose third
//! coordinate is the hypocenter depth in kilometers.

use crate::geo::MalformedGeoJson;
use geo_types::Coord;
use geojson::{Feature, GeoJson, JsonObject, Value};

/// A single earthquake event from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeature {
    /// Human-readable location description.
    pub place: String,
    /// Event magnitude, None when the feed reports `null`.
    pub magnitude: Option<f64>,
    /// Depth in kilometers.
    pub depth_km: f64,
    /// Origin time in milliseconds since the Unix epoch.
    pub timestamp_ms: Option<i64>,
    /// Epicenter as (lon, lat).
    pub position: Coord<f64>,
}

impl EarthquakeFeature {
    /// Builds an event from a GeoJSON feature.
    ///
    /// Returns None for features without a Point geometry carrying at least
    /// longitude, latitude and depth.
    pub fn from_geojson(feature: &Feature) -> Option<Self> {
        let geometry = feature.geometry.as_ref()?;
        let Value::Point(coords) = &geometry.value else {
            return None;
        };
        if coords.len() < 3 {
            return None;
        }

        let empty = JsonObject::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);

        let place = props
            .get("place")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let magnitude = props.get("mag").and_then(|v| v.as_f64());
        let timestamp_ms = props
            .get("time")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));

        Some(Self {
            place,
            magnitude,
            depth_km: coords[2],
            timestamp_ms,
            position: Coord {
                x: coords[0],
                y: coords[1],
            },
        })
    }
}

/// Parses a feed document into earthquake events.
///
/// The document must be a FeatureCollection; individual features that are
/// not usable points are skipped.
pub fn parse_feed(body: &str) -> Result<Vec<EarthquakeFeature>, MalformedGeoJson> {
    let geojson: GeoJson = body
        .parse()
        .map_err(|e| MalformedGeoJson(format!("Failed to parse GeoJSON: {}", e)))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(MalformedGeoJson(
            "Expected a FeatureCollection".to_string(),
        ));
    };

    let total = collection.features.len();
    let events: Vec<EarthquakeFeature> = collection
        .features
        .iter()
        .filter_map(EarthquakeFeature::from_geojson)
        .collect();

    if events.len() < total {
        log::debug!(
            "Skipped {} feed feature(s) without a usable point geometry",
            total - events.len()
        );
    }

    Ok(events)
}
