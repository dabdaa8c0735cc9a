// ============================================================================
// QC Engine Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Rule Evaluation - Westgard rules over a full 10-value window
// 2. Ingestion - End-to-end point recording through the service
// 3. Statistics - Mean/SD/Cpk over growing histories
// ============================================================================

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qc_engine::prelude::*;
use rust_decimal::Decimal;
use std::hint::black_box;

fn m(v: i64) -> Measurement {
    Measurement::from_integer(v).unwrap()
}

// ============================================================================
// Rule Evaluation
// ============================================================================

fn benchmark_rule_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("westgard_rules");
    let engine = WestgardRuleEngine::default();
    let (target, ucl, lcl) = (Some(m(100)), Some(m(130)), Some(m(70)));
    let history: Vec<Measurement> = (101..=109).rev().map(m).collect();

    group.bench_function("derive_zones_and_evaluate", |b| {
        b.iter(|| black_box(engine.evaluate(black_box(m(110)), &history, target, ucl, lcl)));
    });

    let zones = SigmaZones::derive(target, ucl, lcl, RoundingMode::HalfUp).unwrap();
    group.bench_function("evaluate_with_zones", |b| {
        b.iter(|| black_box(engine.evaluate_with_zones(black_box(m(110)), &history, &zones)));
    });

    group.finish();
}

// ============================================================================
// Ingestion
// ============================================================================

fn benchmark_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");

    let service = QcServiceBuilder::new().build().unwrap();
    let chart = service
        .create_chart(
            ChartRequest::new("Bench", MethodId(1))
                .with_control_limits(Decimal::from(100), Decimal::from(130), Decimal::from(70)),
        )
        .unwrap();

    let mut i = 0i64;
    group.bench_function("add_data_point", |b| {
        b.iter(|| {
            i += 1;
            let value = Decimal::new(9_000 + (i % 2_000), 2);
            black_box(
                service
                    .add_data_point(chart, DataPointRequest::new(value), ActorId(1))
                    .unwrap(),
            )
        });
    });

    group.finish();
}

// ============================================================================
// Statistics
// ============================================================================

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    let engine = StatisticsEngine::default();
    let chart = ChartId::new();

    for size in [10usize, 100, 1_000, 10_000] {
        let points: Vec<DataPoint> = (0..size)
            .map(|i| {
                let value = Measurement::from_raw(95_000_000 + (i as i64 % 100) * 100_000);
                DataPoint::new(chart, value, Utc::now(), ActorId(1), RuleSet::EMPTY)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("compute", size), &points, |b, points| {
            b.iter(|| black_box(engine.compute(points, Some(m(120)), Some(m(80)))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rule_evaluation,
    benchmark_ingestion,
    benchmark_statistics
);
criterion_main!(benches);
