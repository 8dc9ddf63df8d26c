//! Value table benchmarks
//!
//! - Greedy lookup across the whole state space
//! - Temporal-difference update
//! - Snapshot encode / decode

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lineq_common::{Action, LightState, TrackingMode};
use lineq_learner::{TableSnapshot, ValueTable};

fn seeded_table() -> ValueTable {
    let mut table = ValueTable::new();
    for (i, (mode, light, action, _)) in ValueTable::new().entries().enumerate() {
        table.set(mode, light, action, (i as f64 * 0.37).sin() * 10.0);
    }
    table
}

fn bench_best_action(c: &mut Criterion) {
    let table = seeded_table();
    c.bench_function("best_action/all_states", |b| {
        b.iter(|| {
            for mode in TrackingMode::ALL {
                for light in LightState::ALL {
                    black_box(table.best_action(black_box(mode), black_box(light)));
                }
            }
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let mut table = seeded_table();
    c.bench_function("update/single", |b| {
        b.iter(|| {
            table.update(
                black_box(TrackingMode::InnerLine),
                black_box(LightState::Middle),
                black_box(Action::PivotRight),
                black_box(5.0),
                TrackingMode::OuterLine,
                LightState::White,
                0.1,
                0.9,
            )
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let table = seeded_table();

    group.bench_function("encode", |b| {
        b.iter(|| {
            TableSnapshot::capture(black_box(&table), None)
                .encode()
                .unwrap()
        })
    });

    let encoded = TableSnapshot::capture(&table, None).encode().unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| {
            TableSnapshot::decode(black_box(&encoded))
                .unwrap()
                .restore()
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_best_action, bench_update, bench_snapshot);
criterion_main!(benches);
