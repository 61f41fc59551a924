pub mod config;
pub mod engine;
pub mod hit;
pub mod positioning;
pub mod profile;
pub mod selector;
pub mod summary;

pub use config::{EngagementConfig, HeatBudget, HeatSinkTech};
pub use engine::{
    estimate_damage_curve, round_to, run_engagement, DamageCurve, EngagementResult, TraceMode,
    TurnRecord, UnitLoadout,
};
pub use hit::hit_chance;
pub use positioning::{
    decide_opponent_move, reposition_opponent, resolve_subject_move, MoveOption, OpponentIntent,
    OptionOutcome, SimulationState, TurnConditions, MIN_DISTANCE,
};
pub use profile::{
    build_profile, build_profiles, FiringMode, FiringProfile, FiringSubmode, RangeBands,
    WeaponCategory, WeaponRecord,
};
pub use selector::{
    best_mode_damage, select_damage, select_damage_by_copy, select_weapons, FiringSituation,
    ScoredWeapon,
};
pub use summary::{summarize, OptimalRange, UnitFrame, UnitSummary};
