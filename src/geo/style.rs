//! Path styling and CSS color tokens.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

/// Stroke and fill options for a vector layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    /// CSS color token used for stroke and fill.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f32,
    /// Stroke opacity (0.0 - 1.0).
    pub opacity: f32,
    /// Polygon fill opacity (0.0 - 1.0).
    pub fill_opacity: f32,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: "#3388ff".to_string(),
            weight: 3.0,
            opacity: 1.0,
            fill_opacity: 0.2,
        }
    }
}

impl LayerStyle {
    pub fn new(color: impl Into<String>, weight: f32) -> Self {
        Self {
            color: color.into(),
            weight,
            ..Default::default()
        }
    }

    pub fn with_fill_opacity(mut self, fill_opacity: f32) -> Self {
        self.fill_opacity = fill_opacity;
        self
    }

    pub fn stroke_color(&self) -> Color32 {
        with_opacity(parse_color(&self.color), self.opacity)
    }

    pub fn fill_color(&self) -> Color32 {
        with_opacity(parse_color(&self.color), self.fill_opacity)
    }
}

/// Named colors accepted in configuration besides `#rgb`/`#rrggbb`.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("yellow", [255, 255, 0]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("lightgreen", [144, 238, 144]),
    ("darkred", [139, 0, 0]),
];

/// Parses a CSS color token, or None if it is not recognised.
pub fn try_parse_color(token: &str) -> Option<Color32> {
    let token = token.trim();

    if let Some(hex) = token.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        return match hex.len() {
            6 => Some(Color32::from_rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Color32::from_rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|(_, [r, g, b])| Color32::from_rgb(*r, *g, *b))
}

/// Parses a CSS color token, falling back to magenta so bad config is visible.
pub fn parse_color(token: &str) -> Color32 {
    try_parse_color(token).unwrap_or_else(|| {
        log::warn!("Unrecognised color token: {}", token);
        Color32::from_rgb(255, 0, 255)
    })
}

/// Applies an opacity factor to an opaque color.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            try_parse_color("#32CD32"),
            Some(Color32::from_rgb(50, 205, 50))
        );
        assert_eq!(
            try_parse_color("#d7301f"),
            Some(Color32::from_rgb(215, 48, 31))
        );
        assert_eq!(try_parse_color("#f00"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(try_parse_color("#12345"), None);
        assert_eq!(try_parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(try_parse_color("red"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(
            try_parse_color("Purple"),
            Some(Color32::from_rgb(128, 0, 128))
        );
        assert_eq!(try_parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_style_opacity() {
        let style = LayerStyle::new("green", 2.0).with_fill_opacity(0.4);
        assert_eq!(style.stroke_color().a(), 255);
        assert_eq!(style.fill_color().a(), 102);
    }
}
