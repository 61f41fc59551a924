//! Unit records as exported by the equipment database, and their on-disk
//! layout: `<dir>/index.json` plus one `<dir>/<id>.json` per unit.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::combat::{HeatSinkTech, UnitFrame, UnitLoadout, WeaponRecord};

pub const DEFAULT_UNITS_DIR: &str = "data/units";
pub const UNITS_DIR_ENV: &str = "MECHCURVE_DATA_DIR";
pub const INDEX_FILE: &str = "index.json";

/// Units directory, honoring `MECHCURVE_DATA_DIR`.
pub fn units_dir() -> PathBuf {
    std::env::var(UNITS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_UNITS_DIR))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub chassis: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub tonnage: u32,
    #[serde(default)]
    pub walk_mp: u32,
    #[serde(default)]
    pub run_mp: u32,
    #[serde(default)]
    pub jump_mp: u32,
    #[serde(default)]
    pub heat_sink_count: u32,
    /// Free text such as "Single", "Double", "Laser" or "Compact".
    #[serde(default)]
    pub heat_sink_type: String,
    #[serde(default)]
    pub has_targeting_computer: bool,
    #[serde(default)]
    pub armor_total: u32,
    #[serde(default)]
    pub internal_structure_total: u32,
    #[serde(default)]
    pub weapons: Vec<WeaponRecord>,
}

impl UnitRecord {
    pub fn display_name(&self) -> String {
        match (self.chassis.trim(), self.model.trim()) {
            ("", "") => self.id.clone(),
            (chassis, "") => chassis.to_string(),
            ("", model) => model.to_string(),
            (chassis, model) => format!("{chassis} {model}"),
        }
    }

    pub fn to_loadout(&self) -> UnitLoadout {
        UnitLoadout {
            walk_mp: self.walk_mp,
            heat_sink_count: self.heat_sink_count,
            heat_sink_tech: HeatSinkTech::from_type_label(&self.heat_sink_type),
            has_targeting_computer: self.has_targeting_computer,
            weapons: self
                .weapons
                .iter()
                .cloned()
                .map(WeaponRecord::with_inferred_dual_mode)
                .collect(),
        }
    }

    pub fn frame(&self) -> UnitFrame {
        UnitFrame {
            run_mp: self.run_mp,
            jump_mp: self.jump_mp,
            armor_total: self.armor_total,
            internal_structure_total: self.internal_structure_total,
        }
    }
}

/// Index of all units for name resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitIndex {
    #[serde(default)]
    pub data_version: Option<String>,
    pub units: Vec<UnitIndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitIndexEntry {
    pub id: String,
    pub chassis: String,
    pub model: String,
}

#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    NotFound(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "unable to read '{}': {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "unable to parse '{}': {source}", path.display())
            }
            Self::NotFound(name) => write!(f, "unit '{name}' not found"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NotFound(_) => None,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_unit_index(dir: &Path) -> Result<UnitIndex, LoadError> {
    read_json(&dir.join(INDEX_FILE))
}

/// Load a unit file. A record without an id takes the file stem.
pub fn load_unit_file(path: &Path) -> Result<UnitRecord, LoadError> {
    let mut record: UnitRecord = read_json(path)?;
    if record.id.trim().is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            record.id = stem.to_string();
        }
    }
    Ok(record)
}

pub fn load_unit_record(dir: &Path, id: &str) -> Result<UnitRecord, LoadError> {
    let path = dir.join(format!("{id}.json"));
    if !path.exists() {
        return Err(LoadError::NotFound(id.to_string()));
    }
    load_unit_file(&path)
}

/// Every unit file in `dir` except the index, sorted by id. Unreadable files
/// are logged and skipped.
pub fn load_unit_dir(dir: &Path) -> Result<Vec<UnitRecord>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut units: Vec<UnitRecord> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|name| name != INDEX_FILE)
        })
        .filter_map(|path| match load_unit_file(&path) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(%err, "skipping unit file");
                None
            }
        })
        .collect();
    units.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(units)
}
