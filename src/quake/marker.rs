//! Earthquake feature to circle marker transform.

use super::classify::DepthScale;
use super::feature::EarthquakeFeature;
use chrono::DateTime;
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Presentation options for earthquake markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Marker radius in pixels per unit of magnitude.
    pub radius_scale: f64,
    /// Stroke width in pixels.
    pub weight: f32,
    /// Stroke opacity (0.0 - 1.0).
    pub opacity: f32,
    /// Fill opacity (0.0 - 1.0).
    pub fill_opacity: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius_scale: 4.0,
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}

/// Fixed-structure popup text for a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub magnitude: String,
    pub depth: String,
    pub time: String,
}

impl PopupContent {
    pub fn for_feature(feature: &EarthquakeFeature) -> Self {
        Self {
            title: feature.place.clone(),
            magnitude: match feature.magnitude {
                Some(magnitude) => format!("Magnitude: {}", magnitude),
                None => "Magnitude: Unknown".to_string(),
            },
            depth: format!("Depth: {} km", feature.depth_km),
            time: format!("Time: {}", format_timestamp(feature.timestamp_ms)),
        }
    }

    /// Body lines below the title.
    pub fn lines(&self) -> [&str; 3] {
        [&self.magnitude, &self.depth, &self.time]
    }

    /// Flattens the popup into plain text.
    #[cfg(test)]
    pub fn to_text(&self) -> String {
        let mut text = self.title.clone();
        for line in self.lines() {
            text.push('\n');
            text.push_str(line);
        }
        text
    }
}

/// Formats an epoch-millisecond timestamp for display (UTC).
pub fn format_timestamp(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// A circle marker ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeMarker {
    /// Epicenter as (lon, lat).
    pub position: Coord<f64>,
    /// Radius in pixels. Not clamped: zero or negative values are degenerate,
    /// and an unknown magnitude gives zero.
    pub radius: f64,
    /// Color token shared by fill and stroke.
    pub color: String,
    pub weight: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
    pub popup: PopupContent,
}

impl QuakeMarker {
    pub fn from_feature(
        feature: &EarthquakeFeature,
        depth_scale: &DepthScale,
        style: &MarkerStyle,
    ) -> Self {
        Self {
            position: feature.position,
            radius: feature.magnitude.unwrap_or(0.0) * style.radius_scale,
            color: depth_scale.classify(feature.depth_km).to_string(),
            weight: style.weight,
            opacity: style.opacity,
            fill_opacity: style.fill_opacity,
            popup: PopupContent::for_feature(feature),
        }
    }

    /// Whether the marker has a drawable area.
    pub fn is_degenerate(&self) -> bool {
        self.radius.is_nan() || self.radius <= 0.0
    }
}

/// One layer holding a marker per earthquake.
#[derive(Debug, Clone, Default)]
pub struct EarthquakeLayer {
    pub markers: Vec<QuakeMarker>,
}

impl EarthquakeLayer {
    pub fn build(
        features: &[EarthquakeFeature],
        depth_scale: &DepthScale,
        style: &MarkerStyle,
    ) -> Self {
        Self {
            markers: features
                .iter()
                .map(|f| QuakeMarker::from_feature(f, depth_scale, style))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testville() -> EarthquakeFeature {
        EarthquakeFeature {
            place: "10km N of Testville".to_string(),
            magnitude: Some(5.2),
            depth_km: 15.0,
            timestamp_ms: Some(1714564800000),
            position: Coord { x: -100.0, y: 40.0 },
        }
    }

    #[test]
    fn test_testville_marker() {
        let marker =
            QuakeMarker::from_feature(&testville(), &DepthScale::default(), &MarkerStyle::default());

        assert_eq!(marker.radius, 20.8);
        assert_eq!(marker.color, "#32CD32");
        assert_eq!(marker.position, Coord { x: -100.0, y: 40.0 });

        let text = marker.popup.to_text();
        assert!(text.contains("10km N of Testville"));
        assert!(text.contains("5.2"));
        assert!(text.contains("15 km"));
    }

    #[test]
    fn test_radius_scales_with_magnitude() {
        let scale = DepthScale::default();
        let style = MarkerStyle::default();
        for mag in [0.0, 1.0, 2.5, 7.75] {
            let feature = EarthquakeFeature {
                magnitude: Some(mag),
                ..testville()
            };
            let marker = QuakeMarker::from_feature(&feature, &scale, &style);
            assert_eq!(marker.radius, 4.0 * mag);
        }
    }

    #[test]
    fn test_degenerate_markers_are_not_clamped() {
        let feature = EarthquakeFeature {
            magnitude: Some(-0.5),
            ..testville()
        };
        let marker =
            QuakeMarker::from_feature(&feature, &DepthScale::default(), &MarkerStyle::default());
        assert_eq!(marker.radius, -2.0);
        assert!(marker.is_degenerate());

        let zero = EarthquakeFeature {
            magnitude: Some(0.0),
            ..testville()
        };
        let marker =
            QuakeMarker::from_feature(&zero, &DepthScale::default(), &MarkerStyle::default());
        assert!(marker.is_degenerate());
    }

    #[test]
    fn test_color_follows_depth() {
        let scale = DepthScale::default();
        let style = MarkerStyle::default();
        for depth in [-5.0, 10.0, 30.5, 70.0, 95.0] {
            let feature = EarthquakeFeature {
                depth_km: depth,
                ..testville()
            };
            let marker = QuakeMarker::from_feature(&feature, &scale, &style);
            assert_eq!(marker.color, scale.classify(depth));
        }
    }

    #[test]
    fn test_unknown_magnitude() {
        let feature = EarthquakeFeature {
            magnitude: None,
            ..testville()
        };
        let marker =
            QuakeMarker::from_feature(&feature, &DepthScale::default(), &MarkerStyle::default());
        assert_eq!(marker.popup.magnitude, "Magnitude: Unknown");
        assert_eq!(marker.radius, 0.0);
        assert!(marker.is_degenerate());
    }

    #[test]
    fn test_popup_time() {
        let popup = PopupContent::for_feature(&testville());
        assert_eq!(popup.time, "Time: Wed May 01 2024 12:00:00 UTC");
        assert_eq!(format_timestamp(None), "Unknown");
    }

    #[test]
    fn test_build_layer() {
        let other = EarthquakeFeature {
            depth_km: 100.0,
            ..testville()
        };
        let layer = EarthquakeLayer::build(
            &[testville(), other],
            &DepthScale::default(),
            &MarkerStyle::default(),
        );
        assert_eq!(layer.len(), 2);
        assert_eq!(layer.markers[1].color, "#990000");
    }
}
