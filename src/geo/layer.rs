//! Vector layer data structures.

use super::style::LayerStyle;
use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry, Value};

/// A GeoJSON document that could not be turned into features.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct MalformedGeoJson(pub String);

/// A geographic feature that can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    /// A single point
    Point(Coord<f64>),
    /// A series of connected line segments (boundaries, steps)
    LineString(Vec<Coord<f64>>),
    /// Multiple line strings
    MultiLineString(Vec<Vec<Coord<f64>>>),
    /// A closed polygon (plates, orogens)
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
    },
    /// Multiple polygons
    MultiPolygon(Vec<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)>),
}

/// A styled vector layer built from one GeoJSON document.
///
/// Styling is per layer; individual features are never inspected beyond
/// their geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLayer {
    /// Stroke/fill options shared by every feature
    pub style: LayerStyle,
    /// Features in this layer
    pub features: Vec<GeoFeature>,
}

fn to_coord(c: &[f64]) -> Option<Coord<f64>> {
    match c {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn to_ring(coords: &[Vec<f64>]) -> Vec<Coord<f64>> {
    coords.iter().filter_map(|c| to_coord(c)).collect()
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)> {
    let (exterior, holes) = rings.split_first()?;
    Some((
        to_ring(exterior),
        holes.iter().map(|ring| to_ring(ring)).collect(),
    ))
}

impl GeoLayer {
    /// Creates a new empty layer with the given style.
    pub fn new(style: LayerStyle) -> Self {
        Self {
            style,
            features: Vec::new(),
        }
    }

    /// Builds a layer from a GeoJSON document.
    pub fn from_geojson(style: LayerStyle, geojson_str: &str) -> Result<Self, MalformedGeoJson> {
        let mut layer = Self::new(style);
        layer.load_from_geojson(geojson_str)?;
        Ok(layer)
    }

    /// Loads features from GeoJSON data.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<(), MalformedGeoJson> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e| MalformedGeoJson(format!("Failed to parse GeoJSON: {}", e)))?;

        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    self.push_feature(feature);
                }
            }
            GeoJson::Feature(f) => self.push_feature(&f),
            GeoJson::Geometry(g) => self.push_geometry(&g),
        }

        Ok(())
    }

    fn push_feature(&mut self, feature: &Feature) {
        if let Some(geometry) = &feature.geometry {
            self.push_geometry(geometry);
        }
    }

    fn push_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::Point(coords) => {
                if let Some(coord) = to_coord(coords) {
                    self.features.push(GeoFeature::Point(coord));
                }
            }
            Value::MultiPoint(points) => {
                self.features.extend(
                    points
                        .iter()
                        .filter_map(|c| to_coord(c))
                        .map(GeoFeature::Point),
                );
            }
            Value::LineString(coords) => {
                self.features.push(GeoFeature::LineString(to_ring(coords)));
            }
            Value::MultiLineString(lines) => {
                self.features.push(GeoFeature::MultiLineString(
                    lines.iter().map(|line| to_ring(line)).collect(),
                ));
            }
            Value::Polygon(rings) => {
                if let Some((exterior, holes)) = to_polygon(rings) {
                    self.features.push(GeoFeature::Polygon { exterior, holes });
                }
            }
            Value::MultiPolygon(polygons) => {
                let polygons: Vec<_> = polygons.iter().filter_map(|p| to_polygon(p)).collect();
                if !polygons.is_empty() {
                    self.features.push(GeoFeature::MultiPolygon(polygons));
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.push_geometry(g);
                }
            }
        }
    }
}
