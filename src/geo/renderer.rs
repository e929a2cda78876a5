//! Vector layer rendering.
//!
//! Renders boundary layers and earthquake markers to the egui canvas.

use super::projection::world_size;
use super::style::{parse_color, with_opacity};
use super::{GeoFeature, GeoLayer, MapProjection};
use crate::quake::{EarthquakeLayer, QuakeMarker};
use eframe::egui::{Color32, Mesh, Painter, Pos2, Shape, Stroke};
use geo_types::Coord;

/// Renders a single boundary layer.
pub fn render_geo_layer(painter: &Painter, layer: &GeoLayer, projection: &MapProjection) {
    let stroke = Stroke::new(layer.style.weight, layer.style.stroke_color());
    let fill = layer.style.fill_color();

    for feature in &layer.features {
        render_feature(painter, feature, projection, stroke, fill);
    }
}

/// Renders every non-degenerate marker of an earthquake layer.
pub fn render_quake_layer(painter: &Painter, layer: &EarthquakeLayer, projection: &MapProjection) {
    for marker in &layer.markers {
        render_marker(painter, marker, projection);
    }
}

/// Finds the top-most marker under a screen position.
pub fn hit_test_marker<'a>(
    layer: &'a EarthquakeLayer,
    projection: &MapProjection,
    pos: Pos2,
) -> Option<&'a QuakeMarker> {
    // Markers are drawn in order, so the last hit is on top
    layer.markers.iter().rev().find(|marker| {
        if marker.is_degenerate() {
            return false;
        }
        let center = projection.geo_to_screen(marker.position);
        let reach = (marker.radius as f32).max(3.0);
        center.distance(pos) <= reach
    })
}

fn render_marker(painter: &Painter, marker: &QuakeMarker, projection: &MapProjection) {
    if marker.is_degenerate() {
        return;
    }

    let center = projection.geo_to_screen(marker.position);
    let radius = marker.radius as f32;
    if !painter.clip_rect().expand(radius).contains(center) {
        return;
    }

    let color = parse_color(&marker.color);
    painter.circle(
        center,
        radius,
        with_opacity(color, marker.fill_opacity),
        Stroke::new(marker.weight, with_opacity(color, marker.opacity)),
    );
}

fn render_feature(
    painter: &Painter,
    feature: &GeoFeature,
    projection: &MapProjection,
    stroke: Stroke,
    fill: Color32,
) {
    match feature {
        GeoFeature::Point(coord) => {
            let pos = projection.geo_to_screen(*coord);
            if painter.clip_rect().contains(pos) {
                painter.circle(pos, 3.0, fill, stroke);
            }
        }
        GeoFeature::LineString(coords) => {
            render_line_string(painter, coords, projection, stroke, false);
        }
        GeoFeature::MultiLineString(lines) => {
            for coords in lines {
                render_line_string(painter, coords, projection, stroke, false);
            }
        }
        GeoFeature::Polygon { exterior, holes } => {
            render_polygon(painter, exterior, holes, projection, stroke, fill);
        }
        GeoFeature::MultiPolygon(polygons) => {
            for (exterior, holes) in polygons {
                render_polygon(painter, exterior, holes, projection, stroke, fill);
            }
        }
    }
}

fn bbox(coords: &[Coord<f64>]) -> (f64, f64, f64, f64) {
    coords.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(min_x, min_y, max_x, max_y), c| {
            (
                min_x.min(c.x),
                min_y.min(c.y),
                max_x.max(c.x),
                max_y.max(c.y),
            )
        },
    )
}

/// True if the segment between two projected points wraps around the world,
/// i.e. the line crosses the antimeridian.
fn crosses_antimeridian(a: Pos2, b: Pos2, projection: &MapProjection) -> bool {
    ((b.x - a.x).abs() as f64) > world_size(projection.zoom) / 2.0
}

/// Projects a ring, dropping the closing point that repeats the first.
fn project_ring(ring: &[Coord<f64>], projection: &MapProjection) -> Vec<Pos2> {
    let mut points: Vec<Pos2> = ring.iter().map(|c| projection.geo_to_screen(*c)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Triangulates a polygon (exterior plus holes, in screen space) into a mesh.
///
/// Returns None for degenerate input or rings that wrap around the world.
fn triangulate_polygon(
    rings: &[Vec<Pos2>],
    projection: &MapProjection,
    fill: Color32,
) -> Option<Mesh> {
    let (exterior, _) = rings.split_first()?;
    if exterior.len() < 3 {
        return None;
    }

    let mut vertices: Vec<Pos2> = Vec::new();
    let mut flat: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for (i, ring) in rings.iter().enumerate() {
        if ring.len() < 3 {
            continue;
        }
        let wraps = ring
            .iter()
            .zip(ring.iter().cycle().skip(1))
            .any(|(a, b)| crosses_antimeridian(*a, *b, projection));
        if wraps {
            return None;
        }
        if i > 0 {
            hole_indices.push(vertices.len());
        }
        for p in ring {
            flat.push(p.x as f64);
            flat.push(p.y as f64);
        }
        vertices.extend_from_slice(ring);
    }

    let indices = match earcutr::earcut(&flat, &hole_indices, 2) {
        Ok(indices) => indices,
        Err(e) => {
            log::debug!("Failed to triangulate polygon: {:?}", e);
            return None;
        }
    };
    if indices.is_empty() {
        return None;
    }

    let mut mesh = Mesh::default();
    for pos in vertices {
        mesh.colored_vertex(pos, fill);
    }
    for triangle in indices.chunks_exact(3) {
        mesh.add_triangle(triangle[0] as u32, triangle[1] as u32, triangle[2] as u32);
    }
    Some(mesh)
}

/// Renders a polygon: a triangulated fill when the style has one, then the
/// outline of every ring.
fn render_polygon(
    painter: &Painter,
    exterior: &[Coord<f64>],
    holes: &[Vec<Coord<f64>>],
    projection: &MapProjection,
    stroke: Stroke,
    fill: Color32,
) {
    if exterior.len() < 3 {
        return;
    }
    let (min_lon, min_lat, max_lon, max_lat) = bbox(exterior);
    if !projection.bbox_visible(min_lon, min_lat, max_lon, max_lat) {
        return;
    }

    if fill.a() > 0 {
        let rings: Vec<Vec<Pos2>> = std::iter::once(exterior)
            .chain(holes.iter().map(Vec::as_slice))
            .map(|ring| project_ring(ring, projection))
            .collect();
        if let Some(mesh) = triangulate_polygon(&rings, projection, fill) {
            painter.add(Shape::mesh(mesh));
        }
    }

    render_line_string(painter, exterior, projection, stroke, true);
    for hole in holes {
        render_line_string(painter, hole, projection, stroke, true);
    }
}

/// Renders a line string (boundary, step, ring outline).
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    projection: &MapProjection,
    stroke: Stroke,
    skip_cull: bool,
) {
    if coords.len() < 2 {
        return;
    }

    if !skip_cull {
        let (min_lon, min_lat, max_lon, max_lat) = bbox(coords);
        if !projection.bbox_visible(min_lon, min_lat, max_lon, max_lat) {
            return;
        }
    }

    let mut points: Vec<Pos2> = Vec::with_capacity(coords.len());
    for coord in coords {
        let pos = projection.geo_to_screen(*coord);
        if let Some(last) = points.last() {
            if crosses_antimeridian(*last, pos, projection) {
                painter.add(Shape::line(std::mem::take(&mut points), stroke));
            }
        }
        points.push(pos);
    }

    if points.len() >= 2 {
        painter.add(Shape::line(points, stroke));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quake::{DepthScale, EarthquakeFeature, MarkerStyle};
    use eframe::egui::{Rect, Vec2};

    fn projection(zoom: f64, width: f32) -> MapProjection {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(width, 600.0));
        MapProjection::new(0.0, 0.0, zoom, rect)
    }

    #[test]
    fn test_triangulates_concave_ring() {
        let arrow = vec![
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 5.0),
            Pos2::new(0.0, 10.0),
            Pos2::new(4.0, 5.0),
        ];
        let mesh = triangulate_polygon(&[arrow], &projection(5.0, 800.0), Color32::RED).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn test_triangulates_ring_with_hole() {
        let outer = vec![
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 0.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(0.0, 10.0),
        ];
        let hole = vec![
            Pos2::new(3.0, 3.0),
            Pos2::new(3.0, 7.0),
            Pos2::new(7.0, 7.0),
            Pos2::new(7.0, 3.0),
        ];
        let mesh =
            triangulate_polygon(&[outer, hole], &projection(5.0, 800.0), Color32::RED).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 24);

        assert!(triangulate_polygon(&[], &projection(5.0, 800.0), Color32::RED).is_none());
    }

    #[test]
    fn test_project_ring_drops_closing_point() {
        let ring = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        assert_eq!(project_ring(&ring, &projection(3.0, 800.0)).len(), 3);
    }

    #[test]
    fn test_antimeridian_split_at_low_zoom() {
        // At zoom 2 the world is 1024 px wide, narrower than the canvas
        let projection = projection(2.0, 2000.0);
        let east = projection.geo_to_screen(Coord { x: 179.0, y: 0.0 });
        let west = projection.geo_to_screen(Coord { x: -179.0, y: 0.0 });
        assert!(crosses_antimeridian(east, west, &projection));

        let a = projection.geo_to_screen(Coord { x: 10.0, y: 0.0 });
        let b = projection.geo_to_screen(Coord { x: 20.0, y: 0.0 });
        assert!(!crosses_antimeridian(a, b, &projection));
    }

    #[test]
    fn test_wrapping_ring_is_not_filled() {
        let projection = projection(2.0, 2000.0);
        let ring: Vec<Pos2> = [(170.0, 10.0), (-170.0, 10.0), (-170.0, -10.0), (170.0, -10.0)]
            .iter()
            .map(|&(x, y)| projection.geo_to_screen(Coord { x, y }))
            .collect();
        assert!(triangulate_polygon(&[ring], &projection, Color32::RED).is_none());
    }

    #[test]
    fn test_hit_test_prefers_top_marker() {
        let features: Vec<EarthquakeFeature> = ["below", "above"]
            .iter()
            .map(|place| EarthquakeFeature {
                place: place.to_string(),
                magnitude: Some(3.0),
                depth_km: 5.0,
                timestamp_ms: None,
                position: Coord { x: -95.71, y: 37.09 },
            })
            .collect();
        let layer =
            EarthquakeLayer::build(&features, &DepthScale::default(), &MarkerStyle::default());
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let projection = MapProjection::new(37.09, -95.71, 5.0, rect);

        let hit = hit_test_marker(&layer, &projection, rect.center() + Vec2::new(5.0, 5.0));
        assert_eq!(hit.map(|m| m.popup.title.as_str()), Some("above"));

        let miss = hit_test_marker(&layer, &projection, rect.center() + Vec2::new(50.0, 0.0));
        assert!(miss.is_none());
    }
}
