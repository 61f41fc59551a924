//! Compare sequential vs parallel batch estimation.
//!
//! Run with: `cargo bench --bench batch_parallel`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mechcurve::combat::{EngagementConfig, WeaponCategory, WeaponRecord};
use mechcurve::data::{load_unit_dir, units_dir, UnitRecord};
use mechcurve::parallel::{estimate_many, summarize_record, WorkerPool};

/// Units from the data directory when present, padded with synthetic ones so
/// the comparison still means something on a bare checkout.
fn units(min_count: usize) -> Vec<UnitRecord> {
    let mut units = load_unit_dir(&units_dir()).unwrap_or_default();
    let mut i = 0;
    while units.len() < min_count {
        units.push(UnitRecord {
            id: format!("synthetic-{i}"),
            walk_mp: 3 + (i % 4) as u32,
            run_mp: 5 + (i % 4) as u32,
            heat_sink_count: 10 + (i % 5) as u32,
            armor_total: 150,
            internal_structure_total: 83,
            weapons: vec![
                WeaponRecord {
                    quantity: 1 + (i % 3) as u32,
                    expected_damage: 5.0,
                    heat: 3,
                    ..WeaponRecord::new("Medium Laser", WeaponCategory::Energy)
                },
                WeaponRecord {
                    expected_damage: 6.96,
                    heat: 4,
                    min_range: Some(6),
                    short_range: Some(7),
                    medium_range: Some(14),
                    long_range: Some(21),
                    ..WeaponRecord::new("LRM 10", WeaponCategory::Missile)
                },
            ],
            ..UnitRecord::default()
        });
        i += 1;
    }
    units
}

fn bench_batch_sequential_vs_parallel(c: &mut Criterion) {
    let config = EngagementConfig::default();
    let unit_list = units(512);

    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| {
            black_box(
                unit_list
                    .iter()
                    .map(|record| summarize_record(record, &config))
                    .collect::<Vec<_>>(),
            )
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(estimate_many(&unit_list, &config, &WorkerPool::default())));
    });

    group.finish();
}

criterion_group!(benches, bench_batch_sequential_vs_parallel);
criterion_main!(benches);
