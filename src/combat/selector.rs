//! Heat-budget weapon selection.
//!
//! Each profile is scored at a distance by its best available mode, then
//! weapons are taken greedily by expected damage per heat point. This is a
//! deliberate greedy rule, not an exact knapsack; outputs depend on it.

use crate::combat::hit::hit_chance;
use crate::combat::profile::{FiringMode, FiringProfile, FiringSubmode};

/// Damage an artillery rack deals to the target when the shell lands one hex off.
const ARTILLERY_ADJACENT_REDUCTION: f64 = 10.0;
/// Chance a missed artillery shot scatters into the adjacent hex.
const ARTILLERY_ADJACENT_SCATTER: f64 = 1.0 / 6.0;

/// Inputs shared by every profile for one candidate movement option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiringSituation {
    pub distance: u32,
    /// Gunnery + attacker movement + target movement bonus.
    pub base_target: i32,
    pub heat_budget: u32,
    pub target_movement_bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredWeapon {
    pub index: usize,
    pub expected_damage: f64,
    pub heat: u32,
    pub copies: u32,
}

impl ScoredWeapon {
    fn damage_per_heat(&self) -> f64 {
        if self.heat == 0 {
            f64::INFINITY
        } else {
            self.expected_damage / f64::from(self.heat)
        }
    }
}

/// Expected damage of one submode fired at `distance` with the usual band and
/// minimum-range penalties. Zero when out of range.
pub fn submode_damage(
    submode: &FiringSubmode,
    distance: u32,
    base_target: i32,
    to_hit_modifier: i32,
) -> f64 {
    let bands = &submode.bands;
    if distance > bands.long {
        return 0.0;
    }
    let target = base_target
        .saturating_add(bands.range_modifier(distance))
        .saturating_add(to_hit_modifier)
        .saturating_add(bands.min_range_penalty(distance));
    submode.expected_damage * hit_chance(target)
}

/// Direct-fire artillery: full rack on a hit, adjacent-hex scatter on a miss.
/// Each launcher resolves on its own; `launchers` copies add linearly.
///
/// The target-movement bonus already folded into `base_target` is removed
/// again here, so artillery ignores whether the target moved. Racks under
/// the adjacent reduction give a negative scatter term; the selector drops
/// the weapon when the total is not positive.
pub fn artillery_damage(
    profile: &FiringProfile,
    rack_value: f64,
    launchers: f64,
    situation: &FiringSituation,
) -> f64 {
    let bands = &profile.base.bands;
    if situation.distance <= bands.min || situation.distance > bands.long || rack_value <= 0.0 {
        return 0.0;
    }
    let target = situation
        .base_target
        .saturating_sub(situation.target_movement_bonus)
        .saturating_add(profile.to_hit_modifier);
    let p_hit = hit_chance(target);
    let miss_damage = (rack_value - ARTILLERY_ADJACENT_REDUCTION) * ARTILLERY_ADJACENT_SCATTER;
    launchers * (rack_value * p_hit + miss_damage * (1.0 - p_hit))
}

/// Best expected damage the profile can offer in this situation.
pub fn best_mode_damage(profile: &FiringProfile, situation: &FiringSituation) -> f64 {
    match profile.mode {
        FiringMode::ArtilleryDirect {
            rack_value,
            launchers,
        } => artillery_damage(profile, rack_value, launchers, situation),
        FiringMode::Standard => submode_damage(
            &profile.base,
            situation.distance,
            situation.base_target,
            profile.to_hit_modifier,
        ),
        FiringMode::DualModeMissile { alternate } => {
            let base = submode_damage(
                &profile.base,
                situation.distance,
                situation.base_target,
                profile.to_hit_modifier,
            );
            let short = submode_damage(
                &alternate,
                situation.distance,
                situation.base_target,
                profile.to_hit_modifier,
            );
            base.max(short)
        }
    }
}

/// Scores every profile, drops the ones that cannot contribute and orders the
/// rest by damage per heat (zero-heat first). Ties keep loadout order.
pub fn score_weapons(profiles: &[FiringProfile], situation: &FiringSituation) -> Vec<ScoredWeapon> {
    let mut scored: Vec<ScoredWeapon> = profiles
        .iter()
        .enumerate()
        .filter_map(|(index, profile)| {
            let expected_damage = best_mode_damage(profile, situation);
            (expected_damage > 0.0).then_some(ScoredWeapon {
                index,
                expected_damage,
                heat: profile.heat,
                copies: profile.copies,
            })
        })
        .collect();
    order_by_damage_per_heat(&mut scored);
    scored
}

/// Zero-heat first, then descending damage per heat. Stable.
pub fn order_by_damage_per_heat(weapons: &mut [ScoredWeapon]) {
    weapons.sort_by(|left, right| right.damage_per_heat().total_cmp(&left.damage_per_heat()));
}

/// Weapons actually fired: zero-heat always, others only when their whole heat
/// still fits in what is left of the budget.
pub fn select_weapons(profiles: &[FiringProfile], situation: &FiringSituation) -> Vec<ScoredWeapon> {
    let mut remaining = situation.heat_budget;
    score_weapons(profiles, situation)
        .into_iter()
        .filter(|weapon| {
            if weapon.heat == 0 {
                return true;
            }
            if weapon.heat <= remaining {
                remaining -= weapon.heat;
                return true;
            }
            false
        })
        .collect()
}

pub fn select_damage(profiles: &[FiringProfile], situation: &FiringSituation) -> f64 {
    select_weapons(profiles, situation)
        .iter()
        .map(|weapon| weapon.expected_damage)
        .sum()
}

/// Greedy fill that treats each stack as its individual copies: a stack that
/// does not fit whole still fires as many copies as the budget has room for.
/// `weapons` must already be ordered.
pub fn fill_by_copy(weapons: &[ScoredWeapon], heat_budget: u32) -> f64 {
    let mut remaining = heat_budget;
    let mut total = 0.0;
    for weapon in weapons {
        if weapon.heat == 0 {
            total += weapon.expected_damage;
            continue;
        }
        let copies = weapon.copies.max(1);
        let copy_heat = (weapon.heat / copies).max(1);
        let fired = copies.min(remaining / copy_heat);
        remaining -= fired * copy_heat;
        total += weapon.expected_damage * f64::from(fired) / f64::from(copies);
    }
    total
}

/// [`select_damage`] with per-copy filling.
pub fn select_damage_by_copy(profiles: &[FiringProfile], situation: &FiringSituation) -> f64 {
    fill_by_copy(&score_weapons(profiles, situation), situation.heat_budget)
}
