//! Run the estimator benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_estimator
//!   cargo run --release --bin benchmark_estimator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, units_per_sec, units_per_min, turns_per_sec, turns_per_game).

use std::fs::OpenOptions;
use std::io::Write;
use std::time::Instant;

use mechcurve::combat::{
    run_engagement, EngagementConfig, HeatSinkTech, TraceMode, UnitLoadout, WeaponCategory,
    WeaponRecord,
};

fn mixed_loadout() -> UnitLoadout {
    UnitLoadout {
        walk_mp: 4,
        heat_sink_count: 12,
        heat_sink_tech: HeatSinkTech::Double,
        has_targeting_computer: false,
        weapons: vec![
            WeaponRecord {
                quantity: 2,
                expected_damage: 5.0,
                heat: 3,
                ..WeaponRecord::new("Medium Laser", WeaponCategory::Energy)
            },
            WeaponRecord {
                expected_damage: 6.96,
                heat: 5,
                min_range: Some(6),
                short_range: Some(7),
                medium_range: Some(14),
                long_range: Some(21),
                ..WeaponRecord::new("LRM 10", WeaponCategory::Missile)
            },
            WeaponRecord {
                expected_damage: 4.0,
                heat: 4,
                rack_size: Some(5),
                ..WeaponRecord::new("MML 5", WeaponCategory::Missile).with_inferred_dual_mode()
            },
        ],
    }
}

fn write_log_line(line: &str) -> std::io::Result<()> {
    let path = "benchmark_log.csv";
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,units_per_sec,units_per_min,turns_per_sec,turns_per_game\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()?;
    println!("Appended to {}", path);
    Ok(())
}

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let unit = mixed_loadout();
    let config = EngagementConfig::default();
    let turns_per_game = config.turns;

    // Run for at least this long or this many units
    const MIN_DURATION_MS: u64 = 2000;
    const MIN_UNITS: u32 = 5000;

    let start = Instant::now();
    let mut units: u32 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS as u128 || units < MIN_UNITS {
        let _ = run_engagement(&unit, &config, TraceMode::Off);
        units += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let units_per_sec = units as f64 / elapsed_secs;
    let units_per_min = units_per_sec * 60.0;
    let turns_per_sec = units_per_sec * (turns_per_game as f64);

    println!("Estimator benchmark ({} turns/game):", turns_per_game);
    println!("  Units:       {}", units);
    println!("  Duration:    {:.2} s", elapsed_secs);
    println!("  Units/s:     {:.2}", units_per_sec);
    println!("  Units/min:   {:.2}", units_per_min);
    println!("  Turns/s:     {:.2}", turns_per_sec);

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{:.4},{:.4},{:.4},{}\n",
            date, units_per_sec, units_per_min, turns_per_sec, turns_per_game
        );
        if let Err(err) = write_log_line(&line) {
            eprintln!("failed to append benchmark_log.csv: {err}");
            std::process::exit(1);
        }
    }
}
