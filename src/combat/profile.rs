//! Weapon records and the firing profiles derived from them.
//!
//! A [`WeaponRecord`] is one mounted weapon stack as delivered by the
//! equipment data. [`build_profile`] folds quantity in, applies the
//! targeting-computer adjustment and decides the [`FiringMode`] once, so the
//! selector never has to look at names or categories again.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SHORT_RANGE: u32 = 3;
pub const DEFAULT_MEDIUM_RANGE: u32 = 6;
pub const DEFAULT_LONG_RANGE: u32 = 9;

/// Short-range submode bands of a dual-mode missile rack.
pub const DUAL_MODE_BANDS: RangeBands = RangeBands {
    min: 0,
    short: 3,
    medium: 6,
    long: 9,
};
/// Damage per tube in the short-range submode.
pub const DUAL_MODE_DAMAGE_PER_TUBE: f64 = 2.0;
/// Assumed average fraction of a cluster that lands.
pub const CLUSTER_EFFICIENCY: f64 = 0.58;

/// Display-name marker used by equipment data for dual-mode missile racks.
pub const DUAL_MODE_NAME_MARKER: &str = "MML";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    Energy,
    Ballistic,
    Missile,
    Artillery,
    #[default]
    #[serde(other)]
    Other,
}

impl WeaponCategory {
    /// Direct-fire categories are the ones a targeting computer assists.
    pub const fn is_direct_fire(self) -> bool {
        matches!(self, Self::Energy | Self::Ballistic)
    }
}

/// One mounted weapon stack. Optional fields fall back to documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type")]
    pub category: WeaponCategory,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Per-shot expected damage, cluster variance already averaged upstream.
    #[serde(default)]
    pub expected_damage: f64,
    #[serde(default)]
    pub heat: u32,
    #[serde(default)]
    pub min_range: Option<u32>,
    #[serde(default)]
    pub short_range: Option<u32>,
    #[serde(default)]
    pub medium_range: Option<u32>,
    #[serde(default)]
    pub long_range: Option<u32>,
    #[serde(default)]
    pub to_hit_modifier: i32,
    #[serde(default)]
    pub rack_size: Option<u32>,
    /// Dual-mode missile rack. `None` means the record did not say; the data
    /// layer fills it in from the name marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_mode: Option<bool>,
}

fn default_quantity() -> u32 {
    1
}

impl WeaponRecord {
    pub fn new(name: impl Into<String>, category: WeaponCategory) -> Self {
        Self {
            name: name.into(),
            category,
            quantity: 1,
            expected_damage: 0.0,
            heat: 0,
            min_range: None,
            short_range: None,
            medium_range: None,
            long_range: None,
            to_hit_modifier: 0,
            rack_size: None,
            dual_mode: None,
        }
    }

    /// True when the display name carries the dual-mode rack marker.
    pub fn name_marks_dual_mode(&self) -> bool {
        self.name.to_uppercase().contains(DUAL_MODE_NAME_MARKER)
    }

    /// Returns the record with `dual_mode` resolved from the name when unset.
    pub fn with_inferred_dual_mode(mut self) -> Self {
        if self.dual_mode.is_none() {
            self.dual_mode = Some(self.name_marks_dual_mode());
        }
        self
    }

    pub fn bands(&self) -> RangeBands {
        RangeBands {
            min: self.min_range.unwrap_or(0),
            short: self.short_range.unwrap_or(DEFAULT_SHORT_RANGE),
            medium: self.medium_range.unwrap_or(DEFAULT_MEDIUM_RANGE),
            long: self.long_range.unwrap_or(DEFAULT_LONG_RANGE),
        }
    }

    fn rack(&self) -> u32 {
        self.rack_size.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBands {
    pub min: u32,
    pub short: u32,
    pub medium: u32,
    pub long: u32,
}

impl RangeBands {
    /// To-hit penalty for the band `distance` falls into. Callers check
    /// `distance <= long` first.
    pub const fn range_modifier(&self, distance: u32) -> i32 {
        if distance <= self.short {
            0
        } else if distance <= self.medium {
            2
        } else {
            4
        }
    }

    pub const fn min_range_penalty(&self, distance: u32) -> i32 {
        if distance > 0 && distance <= self.min {
            (self.min - distance + 1) as i32
        } else {
            0
        }
    }
}

/// A single way of firing a weapon: quantity-scaled damage at given bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiringSubmode {
    pub expected_damage: f64,
    pub bands: RangeBands,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FiringMode {
    Standard,
    /// Long-range base mode plus a short-range submode; the better one fires.
    DualModeMissile { alternate: FiringSubmode },
    /// Binary hit-or-scatter resolution, per launcher, at full rack value.
    ArtilleryDirect { rack_value: f64, launchers: f64 },
}

/// Normalized, quantity-scaled firing data for one weapon stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiringProfile {
    pub name: String,
    pub base: FiringSubmode,
    pub heat: u32,
    /// Copies folded into this stack.
    pub copies: u32,
    pub to_hit_modifier: i32,
    pub mode: FiringMode,
}

impl FiringProfile {
    pub fn is_artillery(&self) -> bool {
        matches!(self.mode, FiringMode::ArtilleryDirect { .. })
    }
}

pub fn build_profile(record: &WeaponRecord, has_targeting_computer: bool) -> FiringProfile {
    let quantity = f64::from(record.quantity);
    let mut to_hit_modifier = record.to_hit_modifier;
    if has_targeting_computer && record.category.is_direct_fire() {
        to_hit_modifier -= 1;
    }

    let dual_mode = record
        .dual_mode
        .unwrap_or_else(|| record.name_marks_dual_mode());

    let mode = if record.category == WeaponCategory::Artillery {
        FiringMode::ArtilleryDirect {
            rack_value: f64::from(record.rack()),
            launchers: quantity,
        }
    } else if dual_mode && record.rack() > 0 {
        FiringMode::DualModeMissile {
            alternate: FiringSubmode {
                expected_damage: f64::from(record.rack())
                    * DUAL_MODE_DAMAGE_PER_TUBE
                    * CLUSTER_EFFICIENCY
                    * quantity,
                bands: DUAL_MODE_BANDS,
            },
        }
    } else {
        FiringMode::Standard
    };

    FiringProfile {
        name: record.name.clone(),
        base: FiringSubmode {
            expected_damage: record.expected_damage * quantity,
            bands: record.bands(),
        },
        heat: record.heat.saturating_mul(record.quantity),
        copies: record.quantity,
        to_hit_modifier,
        mode,
    }
}

pub fn build_profiles(records: &[WeaponRecord], has_targeting_computer: bool) -> Vec<FiringProfile> {
    records
        .iter()
        .map(|record| build_profile(record, has_targeting_computer))
        .collect()
}
