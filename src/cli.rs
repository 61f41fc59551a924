use std::fs;
use std::path::{Path, PathBuf};

use crate::combat::{round_to, run_engagement, EngagementConfig, TraceMode, UnitSummary};
use crate::data::{
    load_unit_dir, load_unit_file, resolve_unit, units_dir, validate_unit_file, LoadError,
    UnitRecord, ValidationSeverity,
};
use crate::data::unit::INDEX_FILE;
use crate::parallel::{estimate_many, summarize_record, WorkerPool};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Curve,
    Summary,
    Batch,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("curve") => Some(Command::Curve),
        Some("summary") => Some(Command::Summary),
        Some("batch") => Some(Command::Batch),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Curve) => handle_curve(args),
        Some(Command::Summary) => handle_summary(args),
        Some(Command::Batch) => handle_batch(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("usage: mechcurve <serve|curve|summary|batch|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = server::bind_addr_from_env();
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Positional arguments after the subcommand, flags and flag values removed.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        if arg == "--csv" {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// A path to a unit file, or an id/name looked up in the units directory.
fn load_unit_arg(arg: &str) -> Result<UnitRecord, LoadError> {
    let path = Path::new(arg);
    if path.is_file() {
        load_unit_file(path)
    } else {
        resolve_unit(arg)
    }
}

fn handle_curve(args: &[String]) -> i32 {
    let Some(unit_arg) = positionals(args).first().copied() else {
        eprintln!("usage: mechcurve curve <unit-file|unit-id> [--table] [--trace]");
        return 2;
    };
    let as_table = args.iter().any(|arg| arg == "--table");
    let with_trace = args.iter().any(|arg| arg == "--trace");

    let record = match load_unit_arg(unit_arg) {
        Ok(record) => record,
        Err(err) => {
            eprintln!("unable to load unit: {err}");
            return 1;
        }
    };

    let trace_mode = if as_table || with_trace {
        TraceMode::Turns
    } else {
        TraceMode::Off
    };
    let result = run_engagement(&record.to_loadout(), &EngagementConfig::default(), trace_mode);

    if as_table {
        println!("turn\tdistance\tsubject_move\topponent\texpected_damage");
        for turn in &result.trace {
            println!(
                "{}\t{}\t{:?}\t{:?}\t{:.2}",
                turn.turn, turn.distance, turn.subject_option, turn.opponent_intent, turn.expected_damage
            );
        }
        println!("total\t\t\t\t{:.2}", round_to(result.raw_total, 2));
        return 0;
    }

    let trace = with_trace.then_some(&result.trace);
    let payload = serde_json::json!({
        "unit": record.id,
        "name": record.display_name(),
        "curve": result.curve,
        "total_damage": round_to(result.raw_total, 2),
        "trace": trace,
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize damage curve: {err}");
            1
        }
    }
}

fn handle_summary(args: &[String]) -> i32 {
    let Some(unit_arg) = positionals(args).first().copied() else {
        eprintln!("usage: mechcurve summary <unit-file|unit-id>");
        return 2;
    };
    let record = match load_unit_arg(unit_arg) {
        Ok(record) => record,
        Err(err) => {
            eprintln!("unable to load unit: {err}");
            return 1;
        }
    };
    let summary = summarize_record(&record, &EngagementConfig::default());
    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize summary: {err}");
            1
        }
    }
}

fn handle_batch(args: &[String]) -> i32 {
    let dir = positionals(args)
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(units_dir);
    let units = match load_unit_dir(&dir) {
        Ok(units) => units,
        Err(err) => {
            eprintln!("unable to load units: {err}");
            return 1;
        }
    };
    let summaries = estimate_many(&units, &EngagementConfig::default(), &WorkerPool::from_env());
    tracing::info!(units = summaries.len(), dir = %dir.display(), "batch estimated");

    if let Some(out) = flag_value(args, "--csv") {
        return match write_summaries_csv(Path::new(out), &summaries) {
            Ok(()) => {
                println!("wrote {} summaries to {out}", summaries.len());
                0
            }
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        };
    }

    match serde_json::to_string_pretty(&summaries) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize summaries: {err}");
            1
        }
    }
}

/// One row per unit; turn columns sized to the longest curve.
pub fn write_summaries_csv(path: &Path, summaries: &[UnitSummary]) -> Result<(), csv::Error> {
    let turns = summaries
        .iter()
        .map(|summary| summary.damage_curve.len())
        .max()
        .unwrap_or(0);
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = [
        "id",
        "tmm",
        "armor_coverage_pct",
        "max_damage",
        "heat_neutral_damage",
        "heat_neutral_range",
        "game_damage",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend((1..=turns).map(|turn| format!("turn_{turn}")));
    writer.write_record(&header)?;

    for summary in summaries {
        let mut row = vec![
            summary.id.clone(),
            summary.tmm.to_string(),
            summary.armor_coverage_pct.to_string(),
            summary.max_damage.to_string(),
            summary.heat_neutral_damage.to_string(),
            summary.heat_neutral_range.hex.to_string(),
            summary.game_damage.to_string(),
        ];
        row.extend(summary.damage_curve.turns().iter().map(f64::to_string));
        row.resize(header.len(), String::new());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn handle_validate(args: &[String]) -> i32 {
    let target = positionals(args)
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(units_dir);

    let files = match unit_files(&target) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("unable to read '{}': {err}", target.display());
            return 1;
        }
    };

    let mut errors = 0;
    let mut warnings = 0;
    for file in &files {
        let path = file.display().to_string();
        match validate_unit_file(&path) {
            Ok(report) => {
                for diag in &report.diagnostics {
                    println!("{path}: {diag}");
                }
                errors += report.count(ValidationSeverity::Error);
                warnings += report.count(ValidationSeverity::Warning);
            }
            Err(err) => {
                eprintln!("{err}");
                errors += 1;
            }
        }
    }

    if errors > 0 {
        eprintln!(
            "validation failed: {errors} error(s), {warnings} warning(s) in {} file(s)",
            files.len()
        );
        1
    } else {
        println!(
            "validation passed: {} file(s), {warnings} warning(s)",
            files.len()
        );
        0
    }
}

fn unit_files(target: &Path) -> std::io::Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = fs::read_dir(target)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| path.file_name().is_some_and(|name| name != INDEX_FILE))
        .collect();
    files.sort();
    Ok(files)
}
