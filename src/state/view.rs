//! Map view state (center, zoom, canvas rectangle).

use crate::config::ViewConfig;
use crate::geo::MapProjection;
use eframe::egui::{Pos2, Rect, Vec2};

/// Current view of the map canvas.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Projection holding center, zoom and the canvas rectangle
    pub projection: MapProjection,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Where double-click returns to
    home: ViewConfig,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl ViewState {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            projection: MapProjection::new(
                config.center_lat,
                config.center_lon,
                config.zoom,
                Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
            ),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            home: config.clone(),
        }
    }

    pub fn center_lat(&self) -> f64 {
        self.projection.center.y
    }

    pub fn center_lon(&self) -> f64 {
        self.projection.center.x
    }

    pub fn zoom(&self) -> f64 {
        self.projection.zoom
    }

    /// Moves the view to a location, clamping zoom to the allowed range.
    pub fn set_view(&mut self, lat: f64, lon: f64, zoom: f64) {
        self.projection.center.y = lat;
        self.projection.center.x = lon;
        self.projection.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_screen_rect(&mut self, rect: Rect) {
        self.projection.screen_rect = rect;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.projection.pan_by(delta);
    }

    /// Multiplies the map scale by `factor` around a screen position.
    pub fn zoom_by(&mut self, anchor: Pos2, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let new_zoom = (self.projection.zoom + factor.log2()).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.projection.zoom).abs() > f64::EPSILON {
            self.projection.zoom_around(anchor, new_zoom);
        }
    }

    /// Returns to the configured initial view.
    pub fn reset(&mut self) {
        let home = self.home.clone();
        self.set_view(home.center_lat, home.center_lon, home.zoom);
    }

    /// Integer zoom level for tile requests.
    pub fn tile_zoom(&self, max_zoom: u8) -> u8 {
        self.projection.zoom.round().clamp(0.0, max_zoom as f64) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_view() {
        let view = ViewState::default();
        assert_eq!(view.center_lat(), 37.09);
        assert_eq!(view.center_lon(), -95.71);
        assert_eq!(view.zoom(), 5.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ViewState::default();
        let anchor = view.projection.screen_rect.center();

        view.zoom_by(anchor, 2.0);
        assert!((view.zoom() - 6.0).abs() < 1e-9);

        view.zoom_by(anchor, 1e9);
        assert_eq!(view.zoom(), 18.0);

        view.zoom_by(anchor, 1e-12);
        assert_eq!(view.zoom(), 1.0);

        view.zoom_by(anchor, -1.0);
        assert_eq!(view.zoom(), 1.0);
    }

    #[test]
    fn test_reset_and_tile_zoom() {
        let mut view = ViewState::default();
        view.pan(Vec2::new(100.0, 100.0));
        view.set_view(10.0, 20.0, 7.6);
        assert_eq!(view.tile_zoom(19), 8);
        assert_eq!(view.tile_zoom(6), 6);

        view.reset();
        assert_eq!(view.center_lat(), 37.09);
        assert_eq!(view.zoom(), 5.0);
    }
}
