//! Criterion benchmarks for the QIO engine and the layout solver.
//!
//! Uses the sphere function to measure pure engine overhead independent of
//! any domain, plus a realistic ceiling layout run.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quopt::layout::{CeilingSpec, LayoutConfig, LayoutRunner};
use quopt::qio::{Bounds, QioConfig, QioRunner};

fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn bench_qio_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("qio_sphere");
    group.sample_size(10);

    for (dim, pop, iters) in [(2usize, 50usize, 100usize), (10, 50, 100), (30, 100, 50)] {
        let bounds = Bounds::new(&vec![(-5.0, 5.0); dim]).unwrap();
        let config = QioConfig::default()
            .with_population_size(pop)
            .with_max_iterations(iters)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_i{}", dim, pop, iters), dim),
            &(bounds, config),
            |b, (bounds, config)| {
                b.iter(|| {
                    let result =
                        QioRunner::run(&sphere, black_box(bounds), black_box(config)).unwrap();
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("ceiling_layout");
    group.sample_size(10);

    for (length, width) in [(4800.0, 3600.0), (9600.0, 7200.0)] {
        let spec = CeilingSpec::new(length, width).with_panel_gap_mm(50.0);
        let config = LayoutConfig::default().with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{length}x{width}")),
            &(spec, config),
            |b, (spec, config)| {
                b.iter(|| {
                    let layout = LayoutRunner::run(black_box(spec), black_box(config)).unwrap();
                    black_box(layout)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_qio_sphere, bench_layout);
criterion_main!(benches);
