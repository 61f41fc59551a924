//! Estimate many units at once.
//!
//! Each unit is independent, so the batch is a plain Rayon map. Output order
//! matches input order.

use rayon::prelude::*;

use crate::combat::{summarize, EngagementConfig, UnitSummary};
use crate::data::UnitRecord;
use crate::parallel::pool::WorkerPool;

pub fn summarize_record(record: &UnitRecord, config: &EngagementConfig) -> UnitSummary {
    summarize(&record.id, &record.to_loadout(), &record.frame(), config)
}

pub fn estimate_many(
    units: &[UnitRecord],
    config: &EngagementConfig,
    pool: &WorkerPool,
) -> Vec<UnitSummary> {
    pool.install(|| {
        units
            .par_iter()
            .map(|record| summarize_record(record, config))
            .collect()
    })
}
