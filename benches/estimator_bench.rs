//! Estimator throughput benchmarks: engagements per second for a few loadouts.
//!
//! Run with: `cargo bench --bench estimator`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mechcurve::combat::{
    run_engagement, EngagementConfig, HeatSinkTech, TraceMode, UnitLoadout, WeaponCategory,
    WeaponRecord,
};

fn laser_boat() -> UnitLoadout {
    UnitLoadout {
        walk_mp: 4,
        heat_sink_count: 13,
        heat_sink_tech: HeatSinkTech::Single,
        has_targeting_computer: false,
        weapons: vec![WeaponRecord {
            quantity: 6,
            expected_damage: 5.0,
            heat: 3,
            ..WeaponRecord::new("Medium Laser", WeaponCategory::Energy)
        }],
    }
}

fn mixed_loadout() -> UnitLoadout {
    UnitLoadout {
        walk_mp: 3,
        heat_sink_count: 15,
        heat_sink_tech: HeatSinkTech::Double,
        has_targeting_computer: true,
        weapons: vec![
            WeaponRecord {
                expected_damage: 10.0,
                heat: 10,
                short_range: Some(6),
                medium_range: Some(12),
                long_range: Some(18),
                ..WeaponRecord::new("ER PPC", WeaponCategory::Energy)
            },
            WeaponRecord {
                quantity: 2,
                expected_damage: 4.0,
                heat: 4,
                rack_size: Some(5),
                ..WeaponRecord::new("MML 5", WeaponCategory::Missile).with_inferred_dual_mode()
            },
            WeaponRecord {
                expected_damage: 0.0,
                heat: 10,
                min_range: Some(6),
                short_range: Some(6),
                medium_range: Some(12),
                long_range: Some(17),
                rack_size: Some(20),
                ..WeaponRecord::new("Arrow IV", WeaponCategory::Artillery)
            },
            WeaponRecord {
                expected_damage: 5.0,
                heat: 1,
                short_range: Some(6),
                medium_range: Some(12),
                long_range: Some(18),
                ..WeaponRecord::new("AC/5", WeaponCategory::Ballistic)
            },
        ],
    }
}

fn bench_estimator(c: &mut Criterion) {
    let config = EngagementConfig::default();

    let mut group = c.benchmark_group("estimator");
    group.sample_size(100);
    group.throughput(Throughput::Elements(1));

    let laser = laser_boat();
    group.bench_function("laser_boat_12_turns", |b| {
        b.iter(|| black_box(run_engagement(&laser, &config, TraceMode::Off)))
    });

    let mixed = mixed_loadout();
    group.bench_function("mixed_loadout_12_turns", |b| {
        b.iter(|| black_box(run_engagement(&mixed, &config, TraceMode::Off)))
    });

    group.bench_function("mixed_loadout_traced", |b| {
        b.iter(|| black_box(run_engagement(&mixed, &config, TraceMode::Turns)))
    });

    group.finish();
}

criterion_group!(benches, bench_estimator);
criterion_main!(benches);
