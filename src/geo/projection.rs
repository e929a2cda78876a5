//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and screen
//! coordinates using the spherical Web Mercator projection shared by slippy
//! map tile servers.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::f64::consts::PI;

/// Edge length of a map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A tile address in the XYZ scheme. `x` is already wrapped into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// A tile to draw: its address plus where it lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub tile: TileCoord,
    pub screen_rect: Rect,
}

/// Width of the world in pixels at a zoom level.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Projects (lon, lat) to world pixel coordinates at `zoom`.
pub fn project(coord: Coord<f64>, zoom: f64) -> Coord<f64> {
    let size = world_size(zoom);
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (coord.x + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    Coord { x, y }
}

/// Inverse of [`project`].
pub fn unproject(world: Coord<f64>, zoom: f64) -> Coord<f64> {
    let size = world_size(zoom);
    let lon = world.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * world.y / size);
    let lat = n.sinh().atan().to_degrees();
    Coord { x: lon, y: lat }
}

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Geographic center of the view as (lon, lat)
    pub center: Coord<f64>,
    /// Current zoom level (fractional)
    pub zoom: f64,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center: Coord { x: -95.71, y: 37.09 },
            zoom: 5.0,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    pub fn new(center_lat: f64, center_lon: f64, zoom: f64, screen_rect: Rect) -> Self {
        Self {
            center: Coord {
                x: center_lon,
                y: center_lat,
            },
            zoom,
            screen_rect,
        }
    }

    fn center_world(&self) -> Coord<f64> {
        project(self.center, self.zoom)
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let world = project(coord, self.zoom);
        let center = self.center_world();
        let screen_center = self.screen_rect.center();
        Pos2::new(
            screen_center.x + (world.x - center.x) as f32,
            screen_center.y + (world.y - center.y) as f32,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let center = self.center_world();
        let offset = pos - self.screen_rect.center();
        unproject(
            Coord {
                x: center.x + offset.x as f64,
                y: center.y + offset.y as f64,
            },
            self.zoom,
        )
    }

    /// Moves the view so content follows a drag of `delta` screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        let center = self.center_world();
        let size = world_size(self.zoom);
        let y = (center.y - delta.y as f64).clamp(0.0, size);
        let mut moved = unproject(
            Coord {
                x: center.x - delta.x as f64,
                y,
            },
            self.zoom,
        );
        moved.x = wrap_longitude(moved.x);
        self.center = moved;
    }

    /// Changes zoom while keeping the geographic point under `anchor` fixed.
    pub fn zoom_around(&mut self, anchor: Pos2, new_zoom: f64) {
        let anchored = self.screen_to_geo(anchor);
        self.zoom = new_zoom;

        let anchored_world = project(anchored, new_zoom);
        let offset = anchor - self.screen_rect.center();
        let mut center = unproject(
            Coord {
                x: anchored_world.x - offset.x as f64,
                y: anchored_world.y - offset.y as f64,
            },
            new_zoom,
        );
        center.x = wrap_longitude(center.x);
        self.center = center;
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }

    /// Checks if a bounding box intersects with the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();

        // Add margin for edge cases
        let margin = 1.0;
        !(max_lon < vis_min_lon - margin
            || min_lon > vis_max_lon + margin
            || max_lat < vis_min_lat - margin
            || min_lat > vis_max_lat + margin)
    }

    /// Lists the tiles at integer zoom `tile_zoom` that cover the screen.
    pub fn visible_tiles(&self, tile_zoom: u8) -> Vec<TilePlacement> {
        let scale = 2f64.powf(self.zoom - tile_zoom as f64);
        let tile_px = TILE_SIZE * scale;
        let tiles_per_axis = 1i64 << tile_zoom;

        let center = self.center_world();
        let rect = self.screen_rect;
        let screen_center = rect.center();

        // World pixel (at self.zoom) of the screen's top-left corner
        let origin_x = center.x - (screen_center.x - rect.min.x) as f64;
        let origin_y = center.y - (screen_center.y - rect.min.y) as f64;

        let first_x = (origin_x / tile_px).floor() as i64;
        let first_y = ((origin_y / tile_px).floor() as i64).max(0);
        let last_x = ((origin_x + rect.width() as f64) / tile_px).floor() as i64;
        let last_y =
            ((((origin_y + rect.height() as f64) / tile_px).floor()) as i64).min(tiles_per_axis - 1);

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            for tx in first_x..=last_x {
                let min = Pos2::new(
                    rect.min.x + (tx as f64 * tile_px - origin_x) as f32,
                    rect.min.y + (ty as f64 * tile_px - origin_y) as f32,
                );
                tiles.push(TilePlacement {
                    tile: TileCoord {
                        z: tile_zoom,
                        x: tx.rem_euclid(tiles_per_axis) as u32,
                        y: ty as u32,
                    },
                    screen_rect: Rect::from_min_size(
                        min,
                        Vec2::splat(tile_px as f32),
                    ),
                });
            }
        }
        tiles
    }
}

/// Wraps a longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_project_world_corners() {
        let origin = project(Coord { x: -180.0, y: MAX_LATITUDE }, 0.0);
        assert!(approx(origin.x, 0.0));
        assert!(origin.y.abs() < 1e-3);

        let center = project(Coord { x: 0.0, y: 0.0 }, 1.0);
        assert!(approx(center.x, 256.0));
        assert!(approx(center.y, 256.0));
    }

    #[test]
    fn test_project_roundtrip() {
        for &(lon, lat) in &[(-95.71, 37.09), (139.7, 35.6), (0.0, -60.0)] {
            let world = project(Coord { x: lon, y: lat }, 5.0);
            let back = unproject(world, 5.0);
            assert!(approx(back.x, lon));
            assert!(approx(back.y, lat));
        }
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(800.0, 600.0));
        let projection = MapProjection::new(37.09, -95.71, 5.0, rect);
        let pos = projection.geo_to_screen(projection.center);
        assert!((pos.x - rect.center().x).abs() < 1e-3);
        assert!((pos.y - rect.center().y).abs() < 1e-3);

        let geo = projection.screen_to_geo(Pos2::new(100.0, 450.0));
        let back = projection.geo_to_screen(geo);
        assert!((back.x - 100.0).abs() < 1e-2);
        assert!((back.y - 450.0).abs() < 1e-2);
    }

    #[test]
    fn test_zoom_around_keeps_anchor() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let mut projection = MapProjection::new(37.09, -95.71, 5.0, rect);
        let anchor = Pos2::new(600.0, 150.0);
        let before = projection.screen_to_geo(anchor);

        projection.zoom_around(anchor, 6.5);
        let after = projection.screen_to_geo(anchor);

        assert!(approx(projection.zoom, 6.5));
        assert!((before.x - after.x).abs() < 1e-4);
        assert!((before.y - after.y).abs() < 1e-4);
    }

    #[test]
    fn test_pan_moves_content_with_drag() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let mut projection = MapProjection::new(37.09, -95.71, 5.0, rect);
        let point = Coord { x: -95.71, y: 37.09 };
        let before = projection.geo_to_screen(point);

        projection.pan_by(Vec2::new(40.0, -25.0));
        let after = projection.geo_to_screen(point);

        assert!((after.x - before.x - 40.0).abs() < 1e-2);
        assert!((after.y - before.y + 25.0).abs() < 1e-2);
    }

    #[test]
    fn test_zoom_zero_covers_single_tile() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(256.0, 256.0));
        let projection = MapProjection::new(0.0, 0.0, 0.0, rect);
        let tiles = projection.visible_tiles(0);
        assert!(tiles
            .iter()
            .all(|t| t.tile == TileCoord { z: 0, x: 0, y: 0 }));
        assert!(tiles
            .iter()
            .any(|t| t.screen_rect.min == Pos2::ZERO));
    }

    #[test]
    fn test_tile_x_wraps() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(1024.0, 256.0));
        let projection = MapProjection::new(0.0, 179.0, 1.0, rect);
        let tiles = projection.visible_tiles(1);
        assert!(tiles.iter().all(|t| t.tile.x < 2 && t.tile.y < 2));
        assert!(tiles.iter().any(|t| t.tile.x == 0));
    }

    #[test]
    fn test_wrap_longitude() {
        assert!(approx(wrap_longitude(190.0), -170.0));
        assert!(approx(wrap_longitude(-190.0), 170.0));
        assert!(approx(wrap_longitude(45.0), 45.0));
    }
}
