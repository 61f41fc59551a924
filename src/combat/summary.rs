//! Aggregate per-unit statistics shown next to the damage curve.

use serde::Serialize;

use crate::combat::config::EngagementConfig;
use crate::combat::engine::{round_to, run_engagement, DamageCurve, TraceMode, UnitLoadout};
use crate::combat::selector::{
    fill_by_copy, order_by_damage_per_heat, select_damage_by_copy, FiringSituation, ScoredWeapon,
};

/// Farthest hex checked when looking for the heat-neutral optimal range.
pub const OPTIMAL_RANGE_SCAN: u32 = 30;

/// Target movement modifier earned by spending `mp` movement points.
pub const fn tmm_from_mp(mp: u32) -> u32 {
    match mp {
        0..=2 => 0,
        3..=4 => 1,
        5..=6 => 2,
        7..=9 => 3,
        10..=17 => 4,
        18..=24 => 5,
        _ => 6,
    }
}

/// Best TMM a unit can present: running, or jumping with its extra +1.
pub const fn unit_tmm(run_mp: u32, jump_mp: u32) -> u32 {
    let run = tmm_from_mp(run_mp);
    if jump_mp == 0 {
        return run;
    }
    let jump = tmm_from_mp(jump_mp) + 1;
    if jump > run {
        jump
    } else {
        run
    }
}

/// Maximum armor for a given internal-structure total. Every location takes
/// twice its structure except the head, which holds 9 on 3 structure.
pub const fn max_armor_from_internal(internal_structure_total: u32) -> u32 {
    if internal_structure_total == 0 {
        return 0;
    }
    2 * internal_structure_total + 3
}

pub fn armor_coverage_pct(armor_total: u32, internal_structure_total: u32) -> f64 {
    let max_armor = max_armor_from_internal(internal_structure_total);
    if max_armor == 0 {
        return 0.0;
    }
    round_to(f64::from(armor_total) / f64::from(max_armor) * 100.0, 2).min(100.0)
}

/// Damage if every weapon fired and hit.
pub fn max_damage(unit: &UnitLoadout) -> f64 {
    let total: f64 = unit
        .firing_profiles()
        .iter()
        .map(|profile| profile.base.expected_damage)
        .sum();
    round_to(total, 2)
}

/// Range-agnostic damage the unit can sustain while walking without heat
/// buildup. Stacks are split into single copies when the budget runs short.
pub fn heat_neutral_damage(unit: &UnitLoadout, config: &EngagementConfig) -> f64 {
    let mut weapons: Vec<ScoredWeapon> = unit
        .firing_profiles()
        .iter()
        .enumerate()
        .map(|(index, profile)| ScoredWeapon {
            index,
            expected_damage: profile.base.expected_damage,
            heat: profile.heat,
            copies: profile.copies,
        })
        .collect();
    order_by_damage_per_heat(&mut weapons);
    round_to(fill_by_copy(&weapons, unit.heat_budget(config).moving), 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalRange {
    /// 0 when the unit never deals damage within the scan.
    pub hex: u32,
    pub expected_damage: f64,
}

/// Hex where a walking unit deals the most heat-neutral damage to a stationary
/// target, filling the budget copy by copy. The nearest hex wins ties.
pub fn heat_neutral_optimal_range(unit: &UnitLoadout, config: &EngagementConfig) -> OptimalRange {
    let profiles = unit.firing_profiles();
    let heat_budget = unit.heat_budget(config).moving;
    let mut best = OptimalRange {
        hex: 0,
        expected_damage: 0.0,
    };
    for distance in 1..=OPTIMAL_RANGE_SCAN {
        let damage = select_damage_by_copy(
            &profiles,
            &FiringSituation {
                distance,
                base_target: config.gunnery.saturating_add(1),
                heat_budget,
                target_movement_bonus: 0,
            },
        );
        if damage > best.expected_damage {
            best = OptimalRange {
                hex: distance,
                expected_damage: damage,
            };
        }
    }
    best.expected_damage = round_to(best.expected_damage, 2);
    best
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSummary {
    pub id: String,
    pub tmm: u32,
    pub armor_coverage_pct: f64,
    pub max_damage: f64,
    pub heat_neutral_damage: f64,
    pub heat_neutral_range: OptimalRange,
    pub game_damage: f64,
    pub damage_curve: DamageCurve,
}

/// Mobility and protection figures that come from the data record rather
/// than the loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitFrame {
    pub run_mp: u32,
    pub jump_mp: u32,
    pub armor_total: u32,
    pub internal_structure_total: u32,
}

pub fn summarize(
    id: &str,
    unit: &UnitLoadout,
    frame: &UnitFrame,
    config: &EngagementConfig,
) -> UnitSummary {
    let engagement = run_engagement(unit, config, TraceMode::Off);
    UnitSummary {
        id: id.to_string(),
        tmm: unit_tmm(frame.run_mp, frame.jump_mp),
        armor_coverage_pct: armor_coverage_pct(frame.armor_total, frame.internal_structure_total),
        max_damage: max_damage(unit),
        heat_neutral_damage: heat_neutral_damage(unit, config),
        heat_neutral_range: heat_neutral_optimal_range(unit, config),
        game_damage: round_to(engagement.raw_total, 2),
        damage_curve: engagement.curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmm_table_edges() {
        let expected = [
            (0, 0),
            (2, 0),
            (3, 1),
            (4, 1),
            (6, 2),
            (9, 3),
            (10, 4),
            (17, 4),
            (24, 5),
            (25, 6),
        ];
        for (mp, tmm) in expected {
            assert_eq!(tmm_from_mp(mp), tmm, "mp {mp}");
        }
    }

    #[test]
    fn jumping_adds_one_over_running() {
        assert_eq!(unit_tmm(6, 0), 2);
        assert_eq!(unit_tmm(6, 4), 2);
        assert_eq!(unit_tmm(6, 5), 3);
        assert_eq!(unit_tmm(0, 1), 1);
    }

    #[test]
    fn armor_coverage_caps_and_handles_missing_structure() {
        assert_eq!(max_armor_from_internal(0), 0);
        assert_eq!(max_armor_from_internal(83), 169);
        assert_eq!(armor_coverage_pct(169, 83), 100.0);
        assert_eq!(armor_coverage_pct(400, 83), 100.0);
        assert_eq!(armor_coverage_pct(100, 0), 0.0);
        assert_eq!(armor_coverage_pct(120, 83), 71.01);
    }
}
