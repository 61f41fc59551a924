//! Where the two units stand each turn.
//!
//! The reference opponent follows a memoryless range-seeking policy computed
//! from the current gap alone. The subject compares advancing, holding and
//! retreating by the damage it could deal from each spot.

use serde::Serialize;

use crate::combat::config::{EngagementConfig, HeatBudget};
use crate::combat::profile::FiringProfile;
use crate::combat::selector::{select_damage, FiringSituation};

/// Units never share a hex, so every evaluated distance is at least this.
pub const MIN_DISTANCE: u32 = 1;

/// Positions on the one-dimensional track. Only the turn loop mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationState {
    pub subject_pos: u32,
    pub opponent_pos: u32,
}

impl SimulationState {
    pub fn opening(config: &EngagementConfig) -> Self {
        Self {
            subject_pos: 0,
            opponent_pos: config.board_length,
        }
    }

    pub fn gap(&self) -> u32 {
        self.opponent_pos.saturating_sub(self.subject_pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentIntent {
    Close,
    Hold,
    Open,
}

impl OpponentIntent {
    /// Whether the opponent counts as having moved for target-movement purposes.
    /// A move blocked by the board edge still counts.
    pub const fn moved(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

/// Reference opponent policy: close when beyond the preferred band, open when
/// inside it, otherwise stand.
pub fn decide_opponent_move(gap: u32, config: &EngagementConfig) -> OpponentIntent {
    if gap > config.reference_band_high {
        OpponentIntent::Close
    } else if gap < config.reference_band_low {
        OpponentIntent::Open
    } else {
        OpponentIntent::Hold
    }
}

/// Applies the opponent's intent without crossing the subject or leaving the board.
pub fn reposition_opponent(
    state: SimulationState,
    intent: OpponentIntent,
    config: &EngagementConfig,
) -> SimulationState {
    let opponent_pos = match intent {
        OpponentIntent::Close => state
            .opponent_pos
            .saturating_sub(config.reference_walk_mp)
            .max(state.subject_pos),
        OpponentIntent::Open => state
            .opponent_pos
            .saturating_add(config.reference_walk_mp)
            .min(config.board_length),
        OpponentIntent::Hold => state.opponent_pos,
    };
    SimulationState {
        opponent_pos,
        ..state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOption {
    Advance,
    Hold,
    Retreat,
}

impl MoveOption {
    /// Evaluation order doubles as tie-break priority.
    pub const ALL: [MoveOption; 3] = [Self::Advance, Self::Hold, Self::Retreat];

    pub const fn moves(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

/// Per-turn firing conditions that do not depend on the subject's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnConditions {
    pub target_movement_bonus: i32,
    pub base_if_moved: i32,
    pub base_if_held: i32,
    pub heat: HeatBudget,
}

impl TurnConditions {
    pub fn new(reference_moved: bool, gunnery: i32, heat: HeatBudget) -> Self {
        let target_movement_bonus = i32::from(reference_moved);
        Self {
            target_movement_bonus,
            base_if_moved: gunnery
                .saturating_add(1)
                .saturating_add(target_movement_bonus),
            base_if_held: gunnery.saturating_add(target_movement_bonus),
            heat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionOutcome {
    pub option: MoveOption,
    pub subject_pos: u32,
    pub distance: u32,
    pub damage: f64,
}

fn subject_destination(state: SimulationState, option: MoveOption, walk_mp: u32) -> u32 {
    match option {
        MoveOption::Advance => state
            .subject_pos
            .saturating_add(walk_mp)
            .min(state.opponent_pos),
        MoveOption::Hold => state.subject_pos,
        MoveOption::Retreat => state.subject_pos.saturating_sub(walk_mp),
    }
}

pub fn evaluate_option(
    profiles: &[FiringProfile],
    state: SimulationState,
    option: MoveOption,
    walk_mp: u32,
    conditions: &TurnConditions,
) -> OptionOutcome {
    let subject_pos = subject_destination(state, option, walk_mp);
    let distance = state
        .opponent_pos
        .saturating_sub(subject_pos)
        .max(MIN_DISTANCE);
    let (base_target, heat_budget) = if option.moves() {
        (conditions.base_if_moved, conditions.heat.moving)
    } else {
        (conditions.base_if_held, conditions.heat.holding)
    };
    let damage = select_damage(
        profiles,
        &FiringSituation {
            distance,
            base_target,
            heat_budget,
            target_movement_bonus: conditions.target_movement_bonus,
        },
    );
    OptionOutcome {
        option,
        subject_pos,
        distance,
        damage,
    }
}

/// Evaluates all three options and keeps the best; earlier options win ties.
pub fn resolve_subject_move(
    profiles: &[FiringProfile],
    state: SimulationState,
    walk_mp: u32,
    conditions: &TurnConditions,
) -> OptionOutcome {
    let [advance, hold, retreat] = MoveOption::ALL
        .map(|option| evaluate_option(profiles, state, option, walk_mp, conditions));
    if advance.damage >= hold.damage && advance.damage >= retreat.damage {
        advance
    } else if hold.damage >= retreat.damage {
        hold
    } else {
        retreat
    }
}
