//! Data loading for the map overlays.
//!
//! Two independent loads run concurrently: the live earthquake feed, and the
//! batch of static boundary documents. The batch is all-or-nothing. Both are
//! awaited together and their outcome is handed over as one [`LoadReport`],
//! which is applied to the overlay registry in a single step.

use crate::config::{AtlasConfig, BoundarySource};
use crate::fetch::{fetch_text, Fetch, FetchError};
use crate::geo::{GeoLayer, MalformedGeoJson};
use crate::quake::{parse_feed, EarthquakeLayer};
use crate::state::{OverlayLayer, OverlayRegistry};
use futures_util::future::{join, try_join_all};

/// Errors that can occur while loading an overlay.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Malformed GeoJSON from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: MalformedGeoJson,
    },
}

/// A boundary document turned into a layer, with its registration details.
#[derive(Debug, Clone)]
pub struct LoadedBoundary {
    pub name: String,
    pub visible: bool,
    pub layer: GeoLayer,
}

/// A load that produced nothing, and the overlays it would have provided.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub layers: Vec<String>,
    pub error: LoadError,
}

/// Outcome of both loads.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub earthquakes: Result<EarthquakeLayer, LoadError>,
    pub boundaries: Result<Vec<LoadedBoundary>, LoadError>,
}

/// Fetches the feed and builds the earthquake marker layer.
pub async fn load_earthquakes<F: Fetch>(
    fetcher: &F,
    config: &AtlasConfig,
) -> Result<EarthquakeLayer, LoadError> {
    let url = &config.earthquake_feed_url;
    let body = fetch_text(fetcher, url).await?;
    let features = parse_feed(&body).map_err(|source| LoadError::Malformed {
        url: url.clone(),
        source,
    })?;

    let layer = EarthquakeLayer::build(&features, &config.depth_scale, &config.marker);
    if layer.is_empty() {
        log::warn!("Feed {} contained no earthquakes", url);
    } else {
        log::info!("Loaded {} earthquake(s) from {}", layer.len(), url);
    }
    Ok(layer)
}

async fn load_boundary<F: Fetch>(
    fetcher: &F,
    source: &BoundarySource,
) -> Result<LoadedBoundary, LoadError> {
    let body = fetch_text(fetcher, &source.url).await?;
    let layer =
        GeoLayer::from_geojson(source.style.clone(), &body).map_err(|e| LoadError::Malformed {
            url: source.url.clone(),
            source: e,
        })?;

    log::debug!(
        "Loaded {} feature(s) for {}",
        layer.features.len(),
        source.name
    );
    Ok(LoadedBoundary {
        name: source.name.clone(),
        visible: source.visible,
        layer,
    })
}

/// Fetches every boundary document concurrently.
///
/// Fails as a whole if any single document fails.
pub async fn load_boundaries<F: Fetch>(
    fetcher: &F,
    config: &AtlasConfig,
) -> Result<Vec<LoadedBoundary>, LoadError> {
    let layers = try_join_all(
        config
            .boundaries
            .iter()
            .map(|source| load_boundary(fetcher, source)),
    )
    .await?;

    log::info!("Loaded {} boundary layer(s)", layers.len());
    Ok(layers)
}

/// Runs both loads concurrently and waits for both to settle.
pub async fn load_all<F: Fetch>(fetcher: &F, config: &AtlasConfig) -> LoadReport {
    let (earthquakes, boundaries) = join(
        load_earthquakes(fetcher, config),
        load_boundaries(fetcher, config),
    )
    .await;

    LoadReport {
        earthquakes,
        boundaries,
    }
}

impl LoadReport {
    /// Registers every successful load and returns the failures.
    ///
    /// A failed load leaves the registry untouched.
    pub fn apply(self, config: &AtlasConfig, registry: &mut OverlayRegistry) -> Vec<LoadFailure> {
        let mut failures = Vec::new();

        match self.earthquakes {
            Ok(layer) => registry.register(
                config.earthquake_layer_name.clone(),
                OverlayLayer::Earthquakes(layer),
                true,
            ),
            Err(error) => failures.push(LoadFailure {
                layers: vec![config.earthquake_layer_name.clone()],
                error,
            }),
        }

        match self.boundaries {
            Ok(boundaries) => {
                for boundary in boundaries {
                    registry.register(
                        boundary.name,
                        OverlayLayer::Vector(boundary.layer),
                        boundary.visible,
                    );
                }
            }
            Err(error) => failures.push(LoadFailure {
                layers: config.boundaries.iter().map(|b| b.name.clone()).collect(),
                error,
            }),
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"place": "10km N of Testville", "mag": 5.2, "time": 1714564800000},
            "geometry": {"type": "Point", "coordinates": [-100.0, 40.0, 15.0]}
        }]
    }"#;

    const LINES: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
        }]
    }"#;

    fn fetcher_for(config: &AtlasConfig) -> MemoryFetcher {
        config
            .boundaries
            .iter()
            .fold(MemoryFetcher::new(), |fetcher, source| {
                fetcher.with_body(&source.url, LINES)
            })
            .with_body(&config.earthquake_feed_url, FEED)
    }

    #[test]
    fn test_load_all_default_visibility() {
        let config = AtlasConfig::default();
        let fetcher = fetcher_for(&config);

        let report = pollster::block_on(load_all(&fetcher, &config));
        let mut registry = OverlayRegistry::new();
        let failures = report.apply(&config, &mut registry);

        assert!(failures.is_empty());
        assert_eq!(registry.len(), 5);

        let mut visible = registry.visible_names();
        visible.sort();
        assert_eq!(visible, vec!["Earthquakes", "Plate Boundaries"]);

        for hidden in ["Orogens", "Tectonic Plates", "Boundary Steps"] {
            assert!(registry.contains(hidden));
            assert!(!registry.is_visible(hidden));
        }
        assert_eq!(fetcher.requests().len(), 5);
    }

    #[test]
    fn test_earthquake_marker_from_feed() {
        let config = AtlasConfig::default();
        let fetcher = fetcher_for(&config);

        let layer = pollster::block_on(load_earthquakes(&fetcher, &config)).unwrap();
        assert_eq!(layer.len(), 1);
        let marker = &layer.markers[0];
        assert_eq!(marker.radius, 20.8);
        assert_eq!(marker.color, "#32CD32");
        assert!(marker.popup.to_text().contains("15 km"));
    }

    #[test]
    fn test_boundary_join_is_all_or_nothing() {
        let config = AtlasConfig::default();

        for failing in 0..config.boundaries.len() {
            let fetcher = fetcher_for(&config).with_error(
                &config.boundaries[failing].url,
                FetchError::Status {
                    url: config.boundaries[failing].url.clone(),
                    status: 500,
                },
            );

            let report = pollster::block_on(load_all(&fetcher, &config));
            assert!(report.boundaries.is_err());

            let mut registry = OverlayRegistry::new();
            let failures = report.apply(&config, &mut registry);

            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].layers.len(), 4);
            assert!(matches!(
                failures[0].error,
                LoadError::Fetch(FetchError::Status { status: 500, .. })
            ));
            // Only the independent earthquake load made it in
            assert_eq!(registry.len(), 1);
            assert!(registry.contains("Earthquakes"));
        }
    }

    #[test]
    fn test_malformed_boundary_fails_batch() {
        let config = AtlasConfig::default();
        let fetcher = fetcher_for(&config).with_body(&config.boundaries[2].url, "{ not json");

        let result = pollster::block_on(load_boundaries(&fetcher, &config));
        match result {
            Err(LoadError::Malformed { url, .. }) => assert_eq!(url, config.boundaries[2].url),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_feed_failure_is_reported() {
        let config = AtlasConfig::default();
        let fetcher = fetcher_for(&config).with_body(&config.earthquake_feed_url, "[]");

        let report = pollster::block_on(load_all(&fetcher, &config));
        let mut registry = OverlayRegistry::new();
        let failures = report.apply(&config, &mut registry);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].layers, vec!["Earthquakes".to_string()]);
        assert!(matches!(failures[0].error, LoadError::Malformed { .. }));
        assert_eq!(registry.len(), 4);
        assert!(!registry.contains("Earthquakes"));
    }

    #[test]
    fn test_reload_keeps_user_visibility() {
        let config = AtlasConfig::default();
        let fetcher = fetcher_for(&config);
        let mut registry = OverlayRegistry::new();

        pollster::block_on(load_all(&fetcher, &config)).apply(&config, &mut registry);
        registry.set_visible("Orogens", true);
        registry.set_visible("Earthquakes", false);

        pollster::block_on(load_all(&fetcher, &config)).apply(&config, &mut registry);
        assert!(registry.is_visible("Orogens"));
        assert!(!registry.is_visible("Earthquakes"));
        assert_eq!(registry.len(), 5);
    }
}
