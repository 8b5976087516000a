//! Aggregation benchmark: score a large count table with the reference weights.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use risk_tracker::risk::{calculate_risk_scores, CountTable, Weights};

fn make_counts(users: usize, weights: &Weights) -> CountTable {
    let mut rng = StdRng::seed_from_u64(42);
    let mut counts = CountTable::new();
    for i in 0..users {
        let name = format!("user_{}", i);
        counts.add_user(&name, &weights.categories, &weights.severities);
        for category in weights.categories.keys() {
            for severity in weights.severities.keys() {
                counts.set(&name, category, severity, rng.gen_range(0..=10));
            }
        }
    }
    counts
}

fn bench_calculate(c: &mut Criterion) {
    let weights = Weights::default();
    let counts = make_counts(1000, &weights);

    c.bench_function("calculate_risk_scores_1000_users", |b| {
        b.iter(|| {
            black_box(calculate_risk_scores(
                black_box(&counts),
                &weights.categories,
                &weights.severities,
            ))
        })
    });
}

criterion_group!(benches, bench_calculate);
criterion_main!(benches);
