//! Engagement parameters. Defaults describe the standard reference fight:
//! two mapsheets end to end, a 4/6 medium-laser opponent that likes 6-8 hexes,
//! and 4-gunnery pilots on both sides.

use serde::{Deserialize, Serialize};

pub const BOARD_LENGTH: u32 = 34;
pub const REFERENCE_WALK_MP: u32 = 4;
pub const REFERENCE_BAND_LOW: u32 = 6;
pub const REFERENCE_BAND_HIGH: u32 = 8;
pub const GUNNERY: i32 = 4;
pub const GAME_TURNS: u32 = 12;
/// Heat generated by walking.
pub const WALK_HEAT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    pub board_length: u32,
    pub turns: u32,
    pub gunnery: i32,
    pub reference_walk_mp: u32,
    pub reference_band_low: u32,
    pub reference_band_high: u32,
    pub walk_heat: u32,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            board_length: BOARD_LENGTH,
            turns: GAME_TURNS,
            gunnery: GUNNERY,
            reference_walk_mp: REFERENCE_WALK_MP,
            reference_band_low: REFERENCE_BAND_LOW,
            reference_band_high: REFERENCE_BAND_HIGH,
            walk_heat: WALK_HEAT,
        }
    }
}

/// Heat-sink technology as far as dissipation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatSinkTech {
    #[default]
    Single,
    Double,
}

impl HeatSinkTech {
    /// Maps a free-text heat-sink type label. Double and laser sinks dissipate
    /// two points each; compact and anything unrecognized dissipate one.
    pub fn from_type_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("double") || lower.contains("laser") {
            Self::Double
        } else {
            Self::Single
        }
    }

    pub const fn per_sink(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

/// Heat a unit can fire each turn without building up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatBudget {
    pub dissipation: u32,
    pub moving: u32,
    pub holding: u32,
}

impl HeatBudget {
    pub fn new(heat_sink_count: u32, tech: HeatSinkTech, walk_heat: u32) -> Self {
        let dissipation = heat_sink_count.saturating_mul(tech.per_sink());
        Self {
            dissipation,
            moving: dissipation.saturating_sub(walk_heat),
            holding: dissipation,
        }
    }
}
