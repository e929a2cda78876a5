//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for secondary labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Layers that failed to load.
    pub const UNAVAILABLE: Color32 = Color32::from_rgb(255, 120, 80);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background behind tiles.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
    /// Placeholder for tiles that have not arrived yet.
    pub const TILE_PLACEHOLDER: Color32 = Color32::from_rgb(32, 32, 48);
    /// Outline drawn around the selected marker.
    pub const SELECTION: Color32 = Color32::WHITE;

    /// Attribution text - requires alpha, use function.
    pub fn attribution_text() -> Color32 {
        Color32::from_rgba_unmultiplied(230, 230, 230, 220)
    }

    /// Attribution backdrop - requires alpha, use function.
    pub fn attribution_background() -> Color32 {
        Color32::from_rgba_unmultiplied(0, 0, 0, 140)
    }
}
