//! Criterion benchmarks for the scoring path.
//!
//! Run with: cargo bench --bench single_prediction

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use flood_risk_rust::{
    map_inputs_to_features, FloodPredictor, FormulaScorer, FormulaVariant, RawReadings,
    RiskScorer,
};

fn bench_formula_scores(c: &mut Criterion) {
    let mut group = c.benchmark_group("formula_score");
    let readings = RawReadings::mumbai_sample();

    for variant in [FormulaVariant::Cutoff, FormulaVariant::WeightedSum] {
        let scorer = FormulaScorer::new(variant);
        group.bench_function(scorer.name(), |b| {
            b.iter(|| black_box(scorer.score(black_box(&readings))));
        });
    }

    group.bench_function("map_inputs_to_features", |b| {
        b.iter(|| black_box(map_inputs_to_features(black_box(&readings))));
    });

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let predictor = FloodPredictor::new(RiskScorer::default());
    let readings = RawReadings::mumbai_sample();

    c.bench_function("predict_single", |b| {
        b.iter(|| black_box(predictor.predict(black_box(&readings))));
    });

    // Sweep rainfall 0-600mm across a 10k batch
    let batch: Vec<RawReadings> = (0..10_000)
        .map(|i| RawReadings::new((i % 600) as f64, 82.0, 29.0, (i % 100) as f64))
        .collect();

    let mut group = c.benchmark_group("predict_batch_10k");
    group.sample_size(20);
    group.bench_function("sequential", |b| {
        b.iter(|| black_box(predictor.predict_all(black_box(&batch))));
    });
    group.bench_function("rayon", |b| {
        b.iter(|| black_box(predictor.predict_batch(black_box(&batch))));
    });
    group.finish();
}

criterion_group!(benches, bench_formula_scores, bench_predict);
criterion_main!(benches);
