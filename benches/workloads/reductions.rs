use criterion::{black_box, BenchmarkId, Criterion};
use distcolor::graph::generate;
use distcolor::{reduce_with, Algorithm, ReductionConfig};

pub fn run(c: &mut Criterion) {
    bench_random_graphs(c);
    bench_stars(c);
}

fn bench_random_graphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_random");
    group.warm_up_time(std::time::Duration::from_millis(500));
    group.measurement_time(std::time::Duration::from_secs(2));
    group.sample_size(10);

    for (nodes, max_degree) in [(256, 4), (1024, 8)] {
        let mut graph = generate::random_bounded(nodes, max_degree, 42).unwrap();
        graph.seed_identity();
        for algorithm in Algorithm::ALL {
            let config = ReductionConfig::new(algorithm).with_seed(7);
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), format!("n{nodes}_d{max_degree}")),
                &graph,
                |b, graph| {
                    b.iter(|| black_box(reduce_with(graph.deep_copy(), &config).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_stars(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_star");
    group.sample_size(10);

    let mut star = generate::star(200).unwrap();
    star.seed_identity();
    for algorithm in [Algorithm::Naive, Algorithm::Kw, Algorithm::ColeVishkin] {
        let config = ReductionConfig::new(algorithm).with_seed(1);
        group.bench_function(algorithm.name(), |b| {
            b.iter(|| black_box(reduce_with(star.deep_copy(), &config).unwrap()));
        });
    }

    group.finish();
}
