//! Tile source definitions and URL templating.

use crate::geo::TileCoord;
use serde::{Deserialize, Serialize};

/// A raster tile provider usable as a base layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSource {
    /// Display name in the layer control
    pub name: String,
    /// URL with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    /// Values substituted for `{s}`
    pub subdomains: Vec<String>,
    /// Attribution text drawn on the map
    pub attribution: String,
    /// Highest zoom level the provider serves
    pub max_zoom: u8,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            name: "Street".to_string(),
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "\u{a9} OpenStreetMap contributors".to_string(),
            max_zoom: 19,
        }
    }
}

impl TileSource {
    pub fn street() -> Self {
        Self::default()
    }

    pub fn satellite() -> Self {
        Self {
            name: "Satellite".to_string(),
            url_template: "https://{s}.satellite.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            ..Self::default()
        }
    }

    /// Expands the template for one tile.
    pub fn tile_url(&self, tile: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (tile.x as u64 + tile.y as u64) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url() {
        let source = TileSource::street();
        let url = source.tile_url(TileCoord { z: 5, x: 7, y: 12 });
        assert_eq!(url, "https://b.tile.openstreetmap.org/5/7/12.png");

        let url = source.tile_url(TileCoord { z: 5, x: 8, y: 12 });
        assert_eq!(url, "https://c.tile.openstreetmap.org/5/8/12.png");
    }

    #[test]
    fn test_tile_url_without_subdomains() {
        let source = TileSource {
            url_template: "https://tiles.example.com/{z}/{y}/{x}.jpg".to_string(),
            subdomains: Vec::new(),
            ..TileSource::default()
        };
        let url = source.tile_url(TileCoord { z: 2, x: 1, y: 3 });
        assert_eq!(url, "https://tiles.example.com/2/3/1.jpg");
    }
}
