//! Record checks for unit files coming out of the equipment database.
//!
//! The estimator itself never rejects input. These checks run on the raw JSON
//! before it is trusted, so bad exports are caught by `mechcurve validate`
//! rather than silently degrading to zero damage.

use std::fmt;
use std::fs;

use serde_json::{Map, Value};

use crate::combat::hit::MAX_ROLL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.count(ValidationSeverity::Error) > 0
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

const KNOWN_CATEGORIES: &[&str] = &["energy", "ballistic", "missile", "artillery", "other"];
const RANGE_FIELDS: &[&str] = &["short_range", "medium_range", "long_range"];

pub fn validate_unit_file(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;
    Ok(validate_unit_value(&payload))
}

pub fn validate_unit_value(payload: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(unit) = payload.as_object() else {
        report.push(ValidationSeverity::Error, "unit", "unit is not an object");
        return report;
    };

    for field in ["walk_mp", "heat_sink_count"] {
        check_count(&mut report, unit, "unit", field, true);
    }
    for field in ["run_mp", "jump_mp", "armor_total", "internal_structure_total"] {
        check_count(&mut report, unit, "unit", field, false);
    }

    match unit.get("weapons") {
        None => report.push(ValidationSeverity::Warning, "unit", "no weapons listed"),
        Some(Value::Array(weapons)) => {
            for (index, weapon) in weapons.iter().enumerate() {
                validate_weapon(&mut report, index, weapon);
            }
        }
        Some(_) => report.push(ValidationSeverity::Error, "unit", "weapons is not an array"),
    }

    report
}

fn validate_weapon(report: &mut ValidationReport, index: usize, weapon: &Value) {
    let Some(object) = weapon.as_object() else {
        report.push(
            ValidationSeverity::Error,
            format!("weapons[{index}]"),
            "weapon is not an object",
        );
        return;
    };
    let name = object.get("name").and_then(Value::as_str).unwrap_or("");
    let context = if name.is_empty() {
        format!("weapons[{index}]")
    } else {
        format!("weapons[{index}] ({name})")
    };

    if object.contains_key("quantity") {
        check_count(report, object, &context, "quantity", false);
        if object.get("quantity").and_then(Value::as_u64) == Some(0) {
            report.push(
                ValidationSeverity::Warning,
                &context,
                "quantity is 0; weapon contributes nothing",
            );
        }
    }
    check_count(report, object, &context, "heat", false);
    for field in ["min_range", "short_range", "medium_range", "long_range", "rack_size"] {
        check_count(report, object, &context, field, false);
    }
    check_modifier(report, object, &context, "to_hit_modifier");

    let category = object
        .get("category")
        .or_else(|| object.get("type"))
        .and_then(Value::as_str)
        .map(str::to_lowercase);
    match category.as_deref() {
        None => report.push(
            ValidationSeverity::Warning,
            &context,
            "category missing; treated as other",
        ),
        Some(c) if !KNOWN_CATEGORIES.contains(&c) => report.push(
            ValidationSeverity::Warning,
            &context,
            format!("unknown category '{c}'; treated as other"),
        ),
        _ => {}
    }

    let missing: Vec<&str> = RANGE_FIELDS
        .iter()
        .copied()
        .filter(|field| object.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        report.push(
            ValidationSeverity::Info,
            &context,
            format!("{} omitted; defaults 3/6/9 apply", missing.join(", ")),
        );
    }

    let range = |field: &str, default: u64| {
        object.get(field).and_then(Value::as_u64).unwrap_or(default)
    };
    let (short, medium, long) = (
        range("short_range", 3),
        range("medium_range", 6),
        range("long_range", 9),
    );
    if !(short <= medium && medium <= long) {
        report.push(
            ValidationSeverity::Warning,
            &context,
            format!("range bands out of order: {short}/{medium}/{long}"),
        );
    }
    if range("min_range", 0) >= long {
        report.push(
            ValidationSeverity::Warning,
            &context,
            "minimum range reaches long range; weapon can never fire",
        );
    }

    let rack = object.get("rack_size").and_then(Value::as_u64).unwrap_or(0);
    if category.as_deref() == Some("artillery") && rack == 0 {
        report.push(
            ValidationSeverity::Warning,
            &context,
            "artillery without rack_size contributes nothing",
        );
    }
    let dual_mode = object
        .get("dual_mode")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| name.to_uppercase().contains(crate::combat::profile::DUAL_MODE_NAME_MARKER));
    if dual_mode && rack == 0 && category.as_deref() != Some("artillery") {
        report.push(
            ValidationSeverity::Warning,
            &context,
            "dual-mode rack without rack_size fires in base mode only",
        );
    }
}

/// Non-negative integer check. `required` turns a missing field into an error.
fn check_count(
    report: &mut ValidationReport,
    object: &Map<String, Value>,
    context: &str,
    field: &str,
    required: bool,
) {
    match object.get(field) {
        None | Some(Value::Null) => {
            if required {
                report.push(
                    ValidationSeverity::Error,
                    context,
                    format!("{field} is required"),
                );
            }
        }
        Some(value) if value.as_u64().is_some() => {}
        Some(value) if value.as_i64().is_some_and(|v| v < 0) => report.push(
            ValidationSeverity::Error,
            context,
            format!("{field} must not be negative"),
        ),
        Some(_) => report.push(
            ValidationSeverity::Error,
            context,
            format!("{field} must be a whole number"),
        ),
    }
}

/// Signed to-hit modifier. Beyond the 2d6 range the weapon always or never hits.
fn check_modifier(
    report: &mut ValidationReport,
    object: &Map<String, Value>,
    context: &str,
    field: &str,
) {
    let limit = i64::from(MAX_ROLL);
    match object.get(field) {
        None | Some(Value::Null) => {}
        Some(value) => match value.as_i64() {
            Some(v) if (-limit..=limit).contains(&v) => {}
            Some(_) => report.push(
                ValidationSeverity::Error,
                context,
                format!("{field} must be between -{limit} and {limit}"),
            ),
            None => report.push(
                ValidationSeverity::Error,
                context,
                format!("{field} must be a whole number"),
            ),
        },
    }
}
