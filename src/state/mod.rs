//! Application state management.
//!
//! State is owned by the UI thread. Background loads never touch it
//! directly; their reports are applied here in one step.

mod overlays;
pub mod url_state;
mod view;

pub use overlays::{OverlayLayer, OverlayRegistry};
pub use view::ViewState;

use crate::config::AtlasConfig;
use crate::map::{LoadFailure, LoadReport};
use crate::quake::{PopupContent, QuakeMarker};
use geo_types::Coord;

/// The failure from the last load that covers `name`, if any.
pub fn failure_for<'a>(failures: &'a [LoadFailure], name: &str) -> Option<&'a LoadFailure> {
    failures
        .iter()
        .find(|failure| failure.layers.iter().any(|layer| layer == name))
}

/// A marker the user clicked, with the popup it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedQuake {
    pub position: Coord<f64>,
    pub popup: PopupContent,
}

impl From<&QuakeMarker> for SelectedQuake {
    fn from(marker: &QuakeMarker) -> Self {
        Self {
            position: marker.position,
            popup: marker.popup.clone(),
        }
    }
}

/// Root application state containing all sub-states.
pub struct AppState {
    pub config: AtlasConfig,

    /// Named overlays shown in the layer control
    pub overlays: OverlayRegistry,

    /// Index of the active base layer in `config.base_layers`
    pub active_base: usize,

    /// Map center, zoom and canvas rectangle
    pub view: ViewState,

    /// Loads that produced nothing during the last attempt
    pub load_failures: Vec<LoadFailure>,

    /// Marker whose popup is open
    pub selected: Option<SelectedQuake>,

    /// Status message shown in the top bar
    pub status_message: String,

    /// Set by the UI; the app starts a new load on the next frame
    pub reload_requested: bool,
}

impl AppState {
    pub fn new(config: AtlasConfig) -> Self {
        let view = ViewState::from_config(&config.view);
        Self {
            active_base: config.default_base,
            view,
            config,
            overlays: OverlayRegistry::new(),
            load_failures: Vec::new(),
            selected: None,
            status_message: "Loading...".to_string(),
            reload_requested: false,
        }
    }

    /// The base layer currently drawn under the overlays.
    pub fn active_base_layer(&self) -> Option<&crate::tiles::TileSource> {
        self.config.base_layers.get(self.active_base)
    }

    /// Registers a finished load and records what failed.
    pub fn handle_load_report(&mut self, report: LoadReport) {
        let failures = report.apply(&self.config, &mut self.overlays);

        for failure in &failures {
            log::warn!(
                "{} unavailable: {}",
                failure.layers.join(", "),
                failure.error
            );
        }

        self.status_message = if failures.is_empty() {
            let quakes = self
                .overlays
                .get(&self.config.earthquake_layer_name)
                .map(|entry| entry.layer.feature_count())
                .unwrap_or(0);
            format!("Loaded {} earthquakes", quakes)
        } else {
            // Layers from an earlier load stay registered when a reload fails
            let (stale, unavailable): (Vec<&str>, Vec<&str>) = failures
                .iter()
                .flat_map(|f| f.layers.iter().map(String::as_str))
                .partition(|name| self.overlays.contains(name));

            let mut parts = Vec::new();
            if !unavailable.is_empty() {
                parts.push(format!("{} layer(s) unavailable", unavailable.len()));
            }
            if !stale.is_empty() {
                parts.push(format!(
                    "{} layer(s) failed to reload, showing previous data",
                    stale.len()
                ));
            }
            parts.join("; ")
        };
        self.load_failures = failures;
    }

    /// Names of configured overlays that failed to load and are not registered.
    pub fn unavailable_layers(&self) -> impl Iterator<Item = (&str, &LoadFailure)> {
        self.load_failures.iter().flat_map(move |failure| {
            failure
                .layers
                .iter()
                .filter(move |name| !self.overlays.contains(name))
                .map(move |name| (name.as_str(), failure))
        })
    }
}
