//! Resolve units by id or name against the unit index.

use std::path::Path;

use crate::data::unit::{load_unit_index, load_unit_record, units_dir, LoadError, UnitIndex, UnitRecord};

/// Normalize a string for lookup: lowercase, collapse spaces/underscores.
fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Id first, then "chassis model", then chassis when only one variant has it.
pub fn resolve_unit_with_index(
    index: &UnitIndex,
    data_dir: &Path,
    name_or_id: &str,
) -> Result<UnitRecord, LoadError> {
    let wanted = normalize_lookup(name_or_id);

    if let Some(entry) = index.units.iter().find(|e| normalize_lookup(&e.id) == wanted) {
        return load_unit_record(data_dir, &entry.id);
    }
    if let Some(entry) = index
        .units
        .iter()
        .find(|e| normalize_lookup(&format!("{} {}", e.chassis, e.model)) == wanted)
    {
        return load_unit_record(data_dir, &entry.id);
    }
    let by_chassis: Vec<_> = index
        .units
        .iter()
        .filter(|e| normalize_lookup(&e.chassis) == wanted)
        .collect();
    if let [only] = by_chassis.as_slice() {
        return load_unit_record(data_dir, &only.id);
    }
    Err(LoadError::NotFound(name_or_id.to_string()))
}

pub fn resolve_unit_in(data_dir: &Path, name_or_id: &str) -> Result<UnitRecord, LoadError> {
    let index = load_unit_index(data_dir)?;
    resolve_unit_with_index(&index, data_dir, name_or_id)
}

/// Resolve against the configured units directory.
pub fn resolve_unit(name_or_id: &str) -> Result<UnitRecord, LoadError> {
    resolve_unit_in(&units_dir(), name_or_id)
}
