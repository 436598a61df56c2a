//! Benchmarks for the periodic seasonal feature
//!
//! Run with: cargo bench --package periodica-features

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use periodica_core::{parse_timestamp, FeatureFrame, Frequency, FrequencyUnit, Period, PeriodIndex};
use periodica_features::{FeatureComputer, PeriodicSeasonalFeature};

fn daily_frame(rows: usize) -> FeatureFrame {
    let freq = Frequency::of(FrequencyUnit::Day);
    let start = Period::parse("2000-01-01", freq).unwrap();
    FeatureFrame::from_index(PeriodIndex::range(start, rows).unwrap())
}

fn bench_transform(c: &mut Criterion) {
    let computer = PeriodicSeasonalFeature::new(
        parse_timestamp("2000-01-01").unwrap(),
        "6 hours",
        1.0,
        "daily_phase",
    )
    .unwrap();

    let mut group = c.benchmark_group("periodic_transform");
    for rows in [100, 10_000, 100_000] {
        let frame = daily_frame(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &frame, |b, frame| {
            b.iter(|| computer.transform(black_box(frame)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
