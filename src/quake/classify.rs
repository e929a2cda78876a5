//! Depth-to-color classification for earthquake markers.

use serde::{Deserialize, Serialize};

/// A single depth band: events deeper than `above_km` get `color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBand {
    /// Exclusive lower bound in kilometers.
    pub above_km: f64,
    /// CSS color token (hex or named).
    pub color: String,
}

impl DepthBand {
    pub fn new(above_km: f64, color: impl Into<String>) -> Self {
        Self {
            above_km,
            color: color.into(),
        }
    }
}

/// Ordered depth bands plus the catch-all color.
///
/// Bands are checked from the deepest threshold down using strict `>`, so a
/// depth sitting exactly on a threshold belongs to the band below it. Any
/// depth that clears no threshold (including NaN, which compares false
/// everywhere) takes `fallback_color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthScale {
    /// Bands sorted by strictly descending `above_km`.
    pub bands: Vec<DepthBand>,
    /// Color for depths at or below the shallowest threshold.
    pub fallback_color: String,
}

impl Default for DepthScale {
    fn default() -> Self {
        Self {
            bands: vec![
                DepthBand::new(90.0, "#990000"),
                DepthBand::new(70.0, "#d7301f"),
                DepthBand::new(50.0, "#fc4e2a"),
                DepthBand::new(30.0, "#008000"),
                DepthBand::new(10.0, "#32CD32"),
            ],
            fallback_color: "#90EE90".to_string(),
        }
    }
}

/// A row of the depth legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub label: String,
    pub color: String,
}

impl DepthScale {
    /// Returns the color token for a depth in kilometers.
    pub fn classify(&self, depth_km: f64) -> &str {
        self.bands
            .iter()
            .find(|band| depth_km > band.above_km)
            .map(|band| band.color.as_str())
            .unwrap_or(&self.fallback_color)
    }

    /// Checks that thresholds are finite and strictly descending.
    pub fn is_well_ordered(&self) -> bool {
        self.bands.iter().all(|b| b.above_km.is_finite())
            && self
                .bands
                .windows(2)
                .all(|pair| pair[0].above_km > pair[1].above_km)
    }

    /// Human-readable legend rows, deepest band first.
    pub fn legend_rows(&self) -> Vec<LegendRow> {
        let mut rows = Vec::with_capacity(self.bands.len() + 1);
        let mut upper: Option<f64> = None;

        for band in &self.bands {
            let label = match upper {
                None => format!("> {} km", band.above_km),
                Some(upper) => format!("{} \u{2013} {} km", band.above_km, upper),
            };
            rows.push(LegendRow {
                label,
                color: band.color.clone(),
            });
            upper = Some(band.above_km);
        }

        let label = match upper {
            Some(lowest) => format!("\u{2264} {} km", lowest),
            None => "All depths".to_string(),
        };
        rows.push(LegendRow {
            label,
            color: self.fallback_color.clone(),
        });

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let scale = DepthScale::default();
        assert_eq!(scale.classify(120.0), "#990000");
        assert_eq!(scale.classify(80.0), "#d7301f");
        assert_eq!(scale.classify(60.0), "#fc4e2a");
        assert_eq!(scale.classify(40.0), "#008000");
        assert_eq!(scale.classify(15.0), "#32CD32");
        assert_eq!(scale.classify(5.0), "#90EE90");
    }

    #[test]
    fn test_thresholds_are_strict() {
        let scale = DepthScale::default();
        assert_eq!(scale.classify(90.0), "#d7301f");
        assert_eq!(scale.classify(90.0001), "#990000");
        assert_eq!(scale.classify(70.0), "#fc4e2a");
        assert_eq!(scale.classify(10.0), "#90EE90");
    }

    #[test]
    fn test_total_over_extremes() {
        let scale = DepthScale::default();
        assert_eq!(scale.classify(-3.5), "#90EE90");
        assert_eq!(scale.classify(f64::MAX), "#990000");
        assert_eq!(scale.classify(f64::INFINITY), "#990000");
        assert_eq!(scale.classify(f64::NEG_INFINITY), "#90EE90");
        // NaN fails every comparison and lands in the catch-all
        assert_eq!(scale.classify(f64::NAN), "#90EE90");
    }

    #[test]
    fn test_monotone_severity() {
        let scale = DepthScale::default();
        let order: Vec<&str> = scale
            .bands
            .iter()
            .map(|b| b.color.as_str())
            .chain(std::iter::once(scale.fallback_color.as_str()))
            .collect();

        let mut last_rank = 0;
        let mut depth = 200.0;
        while depth > -20.0 {
            let color = scale.classify(depth);
            let rank = order.iter().position(|c| *c == color).unwrap();
            assert!(rank >= last_rank, "severity increased at {depth}");
            last_rank = rank;
            depth -= 0.5;
        }
        assert_eq!(last_rank, 5);
    }

    #[test]
    fn test_well_ordered() {
        assert!(DepthScale::default().is_well_ordered());

        let mut scale = DepthScale::default();
        scale.bands.swap(0, 1);
        assert!(!scale.is_well_ordered());

        scale = DepthScale::default();
        scale.bands[2].above_km = f64::NAN;
        assert!(!scale.is_well_ordered());
    }

    #[test]
    fn test_legend_rows() {
        let rows = DepthScale::default().legend_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].label, "> 90 km");
        assert_eq!(rows[1].label, "70 \u{2013} 90 km");
        assert_eq!(rows[4].label, "10 \u{2013} 30 km");
        assert_eq!(rows[5].label, "\u{2264} 10 km");
        assert_eq!(rows[5].color, "#90EE90");
    }
}
