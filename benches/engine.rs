use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parcel::{Engine, EngineConfig, Kmeans, Point};
use rand::prelude::*;

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    let mut rng = StdRng::seed_from_u64(42);
    let n = 4000;
    let k = 15;
    let data: Vec<Point> = (0..n)
        .map(|_| Point::new(rng.random::<f32>(), rng.random::<f32>()))
        .collect();

    group.bench_function("fit_n4000_k15", |b| {
        b.iter(|| {
            let model = Kmeans::new(k).with_seed(1000).with_max_iter(10);
            model.fit(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let mut rng = StdRng::seed_from_u64(42);
    let mut engine = Engine::new(EngineConfig {
        max_samples: 1000,
        ..Default::default()
    })
    .unwrap();
    for _ in 0..1000 {
        engine.push_sample(rng.random::<f32>(), rng.random::<f32>());
    }

    group.bench_function("tick_full_buffer", |b| {
        b.iter(|| {
            engine.push_sample(rng.random::<f32>(), rng.random::<f32>());
            black_box(engine.tick());
        })
    });

    group.bench_function("add_constrained_line", |b| {
        b.iter(|| {
            let p1 = (rng.random::<f32>(), rng.random::<f32>());
            let p2 = (rng.random::<f32>(), rng.random::<f32>());
            black_box(engine.add_constrained_line(p1, p2));
            engine.maintain_capacity(2000, 50);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_tick);
criterion_main!(benches);
