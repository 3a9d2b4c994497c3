//! Benchmarks for chaos-game attractor sampling.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use chaos_garden::{
    compute::{DEFAULT_SKIP, IdGen, Mulberry32, SeedForm, evolution::EvolutionEngine, sample_attractor},
    schema::EvolutionConfig,
};

fn bench_sample_attractor(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_attractor");

    let ids = IdGen::new();
    let genome = SeedForm::SierpinskiTetra.genome(&ids);

    for iterations in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &n| {
                let mut rng = Mulberry32::new(42);
                b.iter(|| {
                    let points = sample_attractor(black_box(&genome), n, DEFAULT_SKIP, &mut rng);
                    black_box(points)
                });
            },
        );
    }

    group.finish();
}

fn bench_evolve_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolve_generation");

    for size in [16usize, 64, 256] {
        let config = EvolutionConfig {
            population_size: size,
            ..Default::default()
        };
        let engine = EvolutionEngine::new(config).expect("valid config");
        let population = engine.initial_population(42);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut rng = Mulberry32::new(42);
            b.iter(|| {
                let next = engine
                    .evolve_generation(black_box(&population), &mut rng)
                    .expect("non-empty population");
                black_box(next)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample_attractor, bench_evolve_generation);
criterion_main!(benches);
