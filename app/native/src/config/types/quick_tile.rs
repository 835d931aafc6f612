//! Quick-tile and electric border configuration types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for screen-edge tiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickTileConfig {
    /// Whether dragging a window against a screen edge tiles it.
    /// Default: true
    pub electric_border: bool,

    /// How long the pointer must rest in an edge zone before the tile
    /// preview is shown, in milliseconds.
    /// Default: 250
    pub electric_border_delay_ms: u64,

    /// Distance from a screen edge that counts as touching it.
    /// Default: 2
    pub edge_threshold: i32,

    /// Whether the top edge maximizes (otherwise it tiles to the top half).
    /// Default: true
    pub top_edge_maximizes: bool,

    /// Percentage of a side edge, measured from each end, that tiles to a
    /// quarter instead of a half. Values above 50 act as 50.
    /// Default: 25
    pub corner_percent: u8,
}

impl Default for QuickTileConfig {
    fn default() -> Self {
        Self {
            electric_border: true,
            electric_border_delay_ms: 250,
            edge_threshold: 2,
            top_edge_maximizes: true,
            corner_percent: 25,
        }
    }
}

impl QuickTileConfig {
    /// Length of the quarter-tiling zone at each end of an edge `length`
    /// pixels long.
    #[must_use]
    pub fn corner_length(&self, length: i32) -> i32 {
        let percent = i64::from(self.corner_percent.min(50));
        // At most half of `length`, so it fits.
        i32::try_from(i64::from(length.max(0)) * percent / 100).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_length_is_a_percentage() {
        let config = QuickTileConfig::default();
        assert_eq!(config.corner_length(1080), 270);
        assert_eq!(config.corner_length(0), 0);
    }

    #[test]
    fn test_corner_percent_caps_at_half() {
        let config = QuickTileConfig { corner_percent: 90, ..Default::default() };
        assert_eq!(config.corner_length(1000), 500);
        assert_eq!(config.corner_length(i32::MAX), i32::MAX / 2);
    }
}
