use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::{run_engagement, DamageCurve, EngagementConfig, TraceMode, TurnRecord, UnitSummary};
use crate::data::{load_unit_index, resolve_unit_in, units_dir, LoadError, UnitRecord};
use crate::parallel::{estimate_many, summarize_record, WorkerPool};

pub const MAX_TURNS: u32 = 100;
pub const MAX_BATCH_UNITS: usize = 1000;
/// Pilot gunnery skill range accepted from requests.
pub const MAX_GUNNERY: i32 = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct CurveRequest {
    pub unit: UnitRecord,
    #[serde(default)]
    pub engagement: Option<EngagementConfig>,
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveResponse {
    pub status: &'static str,
    pub unit: String,
    pub curve: DamageCurve,
    pub total_damage: f64,
    pub engagement: EngagementConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TurnRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    pub unit: UnitRecord,
    #[serde(default)]
    pub engagement: Option<EngagementConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub units: Vec<UnitRecord>,
    #[serde(default)]
    pub engagement: Option<EngagementConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub status: &'static str,
    pub count: usize,
    pub summaries: Vec<UnitSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Validation(ValidationErrorResponse),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(_) => write!(f, "invalid request"),
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound(name) => Self::NotFound(format!("unit '{name}'")),
            other => Self::Internal(other.to_string()),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|err| ApiError::Internal(err.to_string()))
}

pub fn health_payload() -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "mechcurve-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitListItem {
    pub id: String,
    pub name: String,
}

pub fn units_payload() -> Result<String, ApiError> {
    let index = load_unit_index(&units_dir())?;
    let units: Vec<UnitListItem> = index
        .units
        .into_iter()
        .map(|entry| UnitListItem {
            name: format!("{} {}", entry.chassis, entry.model).trim().to_string(),
            id: entry.id,
        })
        .collect();
    to_json(&serde_json::json!({
        "data_version": index.data_version,
        "units": units
    }))
}

fn query_flag(path: &str, key: &str) -> bool {
    let query = path.split('?').nth(1).unwrap_or("");
    query.split('&').any(|pair| {
        let pair = pair.trim();
        pair.eq_ignore_ascii_case(&format!("{key}=1"))
            || pair.eq_ignore_ascii_case(&format!("{key}=true"))
    })
}

fn validate_engagement(config: &EngagementConfig, errors: &mut Vec<ValidationIssue>) {
    if !(1..=MAX_TURNS).contains(&config.turns) {
        errors.push(ValidationIssue {
            field: "engagement.turns",
            messages: vec![format!("must be between 1 and {MAX_TURNS}")],
        });
    }
    if !(0..=MAX_GUNNERY).contains(&config.gunnery) {
        errors.push(ValidationIssue {
            field: "engagement.gunnery",
            messages: vec![format!("must be between 0 and {MAX_GUNNERY}")],
        });
    }
    if config.board_length == 0 {
        errors.push(ValidationIssue {
            field: "engagement.board_length",
            messages: vec!["must be at least 1".to_string()],
        });
    }
    if config.reference_band_low > config.reference_band_high {
        errors.push(ValidationIssue {
            field: "engagement.reference_band_low",
            messages: vec!["must not exceed reference_band_high".to_string()],
        });
    }
}

fn into_result(errors: Vec<ValidationIssue>) -> Result<(), ApiError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(ApiError::Validation(ValidationErrorResponse {
        status: "error",
        message: "Validation failed",
        errors,
    }))
}

fn checked_engagement(engagement: Option<EngagementConfig>) -> Result<EngagementConfig, ApiError> {
    let config = engagement.unwrap_or_default();
    let mut errors = Vec::new();
    validate_engagement(&config, &mut errors);
    into_result(errors)?;
    Ok(config)
}

fn curve_response(
    record: &UnitRecord,
    config: EngagementConfig,
    trace: bool,
) -> Result<String, ApiError> {
    let trace_mode = if trace { TraceMode::Turns } else { TraceMode::Off };
    let result = run_engagement(&record.to_loadout(), &config, trace_mode);
    to_json(&CurveResponse {
        status: "ok",
        unit: record.id.clone(),
        total_damage: crate::combat::round_to(result.raw_total, 2),
        curve: result.curve,
        engagement: config,
        trace: result.trace,
    })
}

pub fn curve_payload(body: &str) -> Result<String, ApiError> {
    let request: CurveRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let config = checked_engagement(request.engagement)?;
    curve_response(&request.unit, config, request.trace)
}

pub fn summary_payload(body: &str) -> Result<String, ApiError> {
    let request: SummaryRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let config = checked_engagement(request.engagement)?;
    to_json(&summarize_record(&request.unit, &config))
}

pub fn batch_payload(body: &str) -> Result<String, ApiError> {
    let request: BatchRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let config = request.engagement.unwrap_or_default();
    let mut errors = Vec::new();
    validate_engagement(&config, &mut errors);
    if request.units.len() > MAX_BATCH_UNITS {
        errors.push(ValidationIssue {
            field: "units",
            messages: vec![format!("at most {MAX_BATCH_UNITS} units per batch")],
        });
    }
    into_result(errors)?;

    let summaries = estimate_many(&request.units, &config, &WorkerPool::from_env());
    to_json(&BatchResponse {
        status: "ok",
        count: summaries.len(),
        summaries,
    })
}

/// `GET /api/units/{id}/curve`, optionally `?trace=1`.
pub fn unit_curve_payload(id: &str, path: &str) -> Result<String, ApiError> {
    let record = resolve_unit_in(&units_dir(), id)?;
    curve_response(&record, EngagementConfig::default(), query_flag(path, "trace"))
}

pub fn unit_summary_payload(id: &str) -> Result<String, ApiError> {
    let record = resolve_unit_in(&units_dir(), id)?;
    to_json(&summarize_record(&record, &EngagementConfig::default()))
}
