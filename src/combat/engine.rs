//! Turn loop for the expected-damage estimate.
//!
//! Every call starts from the opening positions, rebuilds firing profiles and
//! owns its own state, so estimates for different units can run side by side
//! without coordination.

use serde::{Deserialize, Serialize};

use crate::combat::config::{EngagementConfig, HeatBudget, HeatSinkTech};
use crate::combat::positioning::{
    decide_opponent_move, reposition_opponent, resolve_subject_move, MoveOption, OpponentIntent,
    SimulationState, TurnConditions,
};
use crate::combat::profile::{build_profiles, FiringProfile, WeaponRecord};

/// What the estimator needs to know about a unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitLoadout {
    #[serde(default)]
    pub walk_mp: u32,
    #[serde(default)]
    pub heat_sink_count: u32,
    #[serde(default)]
    pub heat_sink_tech: HeatSinkTech,
    #[serde(default)]
    pub has_targeting_computer: bool,
    #[serde(default)]
    pub weapons: Vec<WeaponRecord>,
}

impl UnitLoadout {
    pub fn heat_budget(&self, config: &EngagementConfig) -> HeatBudget {
        HeatBudget::new(self.heat_sink_count, self.heat_sink_tech, config.walk_heat)
    }

    pub fn firing_profiles(&self) -> Vec<FiringProfile> {
        build_profiles(&self.weapons, self.has_targeting_computer)
    }
}

/// Expected damage per turn, one decimal place each.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageCurve(pub Vec<f64>);

impl DamageCurve {
    pub fn turns(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    #[default]
    Off,
    Turns,
}

/// One simulated turn, for inspection and replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub opponent_intent: OpponentIntent,
    pub opponent_pos: u32,
    pub subject_option: MoveOption,
    pub subject_pos: u32,
    pub distance: u32,
    pub expected_damage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementResult {
    pub curve: DamageCurve,
    /// Sum of the un-rounded per-turn values.
    pub raw_total: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TurnRecord>,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Expected damage curve against the standard reference opponent.
pub fn estimate_damage_curve(unit: &UnitLoadout) -> DamageCurve {
    run_engagement(unit, &EngagementConfig::default(), TraceMode::Off).curve
}

pub fn run_engagement(
    unit: &UnitLoadout,
    config: &EngagementConfig,
    trace_mode: TraceMode,
) -> EngagementResult {
    let profiles = unit.firing_profiles();
    let heat = unit.heat_budget(config);
    let mut state = SimulationState::opening(config);
    let mut curve = Vec::with_capacity(config.turns as usize);
    let mut trace = Vec::new();
    let mut raw_total = 0.0;

    for turn in 1..=config.turns {
        let intent = decide_opponent_move(state.gap(), config);
        state = reposition_opponent(state, intent, config);

        let conditions = TurnConditions::new(intent.moved(), config.gunnery, heat);
        let chosen = resolve_subject_move(&profiles, state, unit.walk_mp, &conditions);
        state.subject_pos = chosen.subject_pos;

        raw_total += chosen.damage;
        curve.push(round_to(chosen.damage, 1));

        if trace_mode == TraceMode::Turns {
            trace.push(TurnRecord {
                turn,
                opponent_intent: intent,
                opponent_pos: state.opponent_pos,
                subject_option: chosen.option,
                subject_pos: state.subject_pos,
                distance: chosen.distance,
                expected_damage: chosen.damage,
            });
        }
    }

    tracing::trace!(
        turns = config.turns,
        weapons = profiles.len(),
        raw_total,
        "engagement estimated"
    );

    EngagementResult {
        curve: DamageCurve(curve),
        raw_total,
        trace,
    }
}
