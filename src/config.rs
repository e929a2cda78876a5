//! Application configuration.
//!
//! Every URL, style and threshold the map uses lives here. Defaults reproduce
//! the stock map; a JSON document can override any section. On native the
//! document is read from the file named by `QUAKE_ATLAS_CONFIG` (or
//! `quake-atlas.json` in the working directory); on WASM it is read from
//! localStorage.

use crate::geo::LayerStyle;
use crate::quake::{DepthScale, MarkerStyle};
use crate::tiles::TileSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Errors raised while reading or validating configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// One static boundary document and how to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySource {
    /// Unique overlay name
    pub name: String,
    /// URL or relative path of the GeoJSON document
    pub url: String,
    pub style: LayerStyle,
    /// Shown on the map as soon as it loads
    #[serde(default)]
    pub visible: bool,
}

/// Initial map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center_lat: 37.09,
            center_lon: -95.71,
            zoom: 5.0,
            min_zoom: 1.0,
            max_zoom: 18.0,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Live earthquake GeoJSON feed
    pub earthquake_feed_url: String,
    /// Overlay name of the earthquake layer
    pub earthquake_layer_name: String,
    /// Static boundary documents, fetched as one all-or-nothing batch
    pub boundaries: Vec<BoundarySource>,
    pub depth_scale: DepthScale,
    pub marker: MarkerStyle,
    /// Mutually exclusive base layers
    pub base_layers: Vec<TileSource>,
    /// Index into `base_layers` of the initially active layer
    pub default_base: usize,
    pub view: ViewConfig,
    /// Directory relative URLs resolve against on native
    pub asset_root: String,
    /// Native HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// Decoded tiles kept before off-screen tiles are dropped
    pub tile_cache_capacity: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            earthquake_feed_url:
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
                    .to_string(),
            earthquake_layer_name: "Earthquakes".to_string(),
            boundaries: vec![
                BoundarySource {
                    name: "Plate Boundaries".to_string(),
                    url: "static/GeoJSON/PB2002_boundaries.json".to_string(),
                    style: LayerStyle::new("red", 2.0),
                    visible: true,
                },
                BoundarySource {
                    name: "Orogens".to_string(),
                    url: "static/GeoJSON/PB2002_orogens.json".to_string(),
                    style: LayerStyle::new("green", 2.0).with_fill_opacity(0.4),
                    visible: false,
                },
                BoundarySource {
                    name: "Tectonic Plates".to_string(),
                    url: "static/GeoJSON/PB2002_plates.json".to_string(),
                    style: LayerStyle::new("blue", 1.0),
                    visible: false,
                },
                BoundarySource {
                    name: "Boundary Steps".to_string(),
                    url: "static/GeoJSON/PB2002_steps.json".to_string(),
                    style: LayerStyle::new("purple", 1.0),
                    visible: false,
                },
            ],
            depth_scale: DepthScale::default(),
            marker: MarkerStyle::default(),
            base_layers: vec![TileSource::street(), TileSource::satellite()],
            default_base: 0,
            view: ViewConfig::default(),
            asset_root: ".".to_string(),
            request_timeout_secs: 30,
            tile_cache_capacity: 256,
        }
    }
}

impl AtlasConfig {
    /// localStorage key for persisted config.
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "quake_atlas_config";
    #[cfg(not(target_arch = "wasm32"))]
    const DEFAULT_FILE: &'static str = "quake-atlas.json";
    #[cfg(not(target_arch = "wasm32"))]
    const PATH_ENV: &'static str = "QUAKE_ATLAS_CONFIG";

    /// Parses and validates a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Checks invariants the rest of the app relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.depth_scale.is_well_ordered() {
            return Err(ConfigError::Invalid(
                "depth bands must have finite, strictly descending thresholds".to_string(),
            ));
        }
        if !self.marker.radius_scale.is_finite() {
            return Err(ConfigError::Invalid(
                "marker radius scale must be finite".to_string(),
            ));
        }
        if self.base_layers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one base layer is required".to_string(),
            ));
        }
        if self.default_base >= self.base_layers.len() {
            return Err(ConfigError::Invalid(format!(
                "default base layer {} out of range ({} configured)",
                self.default_base,
                self.base_layers.len()
            )));
        }

        let mut names = HashSet::new();
        let overlay_names = std::iter::once(&self.earthquake_layer_name)
            .chain(self.boundaries.iter().map(|b| &b.name));
        for name in overlay_names {
            if !names.insert(name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate overlay name: {}",
                    name
                )));
            }
        }

        let view = &self.view;
        if !(view.min_zoom <= view.zoom && view.zoom <= view.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "initial zoom {} outside {}..={}",
                view.zoom, view.min_zoom, view.max_zoom
            )));
        }

        Ok(())
    }

    /// Loads configuration, falling back to defaults on any problem.
    pub fn load() -> Self {
        match Self::read_source() {
            Some(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration");
                    config
                }
                Err(e) => {
                    log::warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read_source() -> Option<String> {
        let path = std::env::var(Self::PATH_ENV).unwrap_or_else(|_| Self::DEFAULT_FILE.to_string());
        match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) => {
                if std::env::var_os(Self::PATH_ENV).is_some() {
                    log::warn!("Failed to read config {}: {}", path, e);
                }
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn read_source() -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(Self::STORAGE_KEY).ok()?
    }
}
