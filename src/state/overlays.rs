//! Overlay registry: named, independently toggleable map layers.

use crate::geo::GeoLayer;
use crate::quake::EarthquakeLayer;
use indexmap::IndexMap;

/// Renderable content of an overlay.
#[derive(Debug, Clone)]
pub enum OverlayLayer {
    /// Circle markers, one per earthquake
    Earthquakes(EarthquakeLayer),
    /// Styled vector geometry (boundaries, plates)
    Vector(GeoLayer),
}

impl OverlayLayer {
    /// Number of markers or features in the layer.
    pub fn feature_count(&self) -> usize {
        match self {
            OverlayLayer::Earthquakes(layer) => layer.len(),
            OverlayLayer::Vector(layer) => layer.features.len(),
        }
    }
}

/// A registered overlay and its visibility toggle.
#[derive(Debug, Clone)]
pub struct OverlayEntry {
    pub layer: OverlayLayer,
    pub visible: bool,
}

/// Mapping from unique display name to overlay.
///
/// Iteration follows registration order so the layer control stays stable.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    entries: IndexMap<String, OverlayEntry>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a layer under `name`.
    ///
    /// A layer replacing an existing entry keeps that entry's visibility;
    /// a new entry starts with `visible`.
    pub fn register(&mut self, name: impl Into<String>, layer: OverlayLayer, visible: bool) {
        let name = name.into();
        let visible = self
            .entries
            .get(&name)
            .map(|existing| existing.visible)
            .unwrap_or(visible);
        self.entries.insert(name, OverlayEntry { layer, visible });
    }

    pub fn get(&self, name: &str) -> Option<&OverlayEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut OverlayEntry)> {
        self.entries
            .iter_mut()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Visible vector layers in registration order.
    pub fn visible_vector_layers(&self) -> impl Iterator<Item = &GeoLayer> {
        self.entries.values().filter_map(|entry| match &entry.layer {
            OverlayLayer::Vector(layer) if entry.visible => Some(layer),
            _ => None,
        })
    }

    /// Visible earthquake layers in registration order.
    pub fn visible_quake_layers(&self) -> impl Iterator<Item = &EarthquakeLayer> {
        self.entries.values().filter_map(|entry| match &entry.layer {
            OverlayLayer::Earthquakes(layer) if entry.visible => Some(layer),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
impl OverlayRegistry {
    /// Shows or hides an overlay. Returns false if no such overlay exists.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.visible)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverlayEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Names of overlays currently shown on the map.
    pub fn visible_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, entry)| entry.visible)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LayerStyle;

    fn vector() -> OverlayLayer {
        OverlayLayer::Vector(GeoLayer::new(LayerStyle::default()))
    }

    #[test]
    fn test_register_and_toggle() {
        let mut registry = OverlayRegistry::new();
        registry.register("Plate Boundaries", vector(), true);
        registry.register("Orogens", vector(), false);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.visible_names(), vec!["Plate Boundaries"]);

        assert!(registry.set_visible("Orogens", true));
        assert!(registry.is_visible("Orogens"));
        assert!(!registry.set_visible("Missing", true));
        assert_eq!(registry.visible_vector_layers().count(), 2);
        assert_eq!(registry.visible_quake_layers().count(), 0);
    }

    #[test]
    fn test_reregister_keeps_visibility_and_order() {
        let mut registry = OverlayRegistry::new();
        registry.register("Earthquakes", OverlayLayer::Earthquakes(Default::default()), true);
        registry.register("Plates", vector(), false);
        registry.set_visible("Earthquakes", false);

        registry.register("Earthquakes", OverlayLayer::Earthquakes(Default::default()), true);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_visible("Earthquakes"));

        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Earthquakes", "Plates"]);
    }
}
