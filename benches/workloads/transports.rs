use criterion::{black_box, BenchmarkId, Criterion};
use distcolor::graph::generate;
use distcolor::{reduce_with, Algorithm, ReductionConfig};

/// Channel versus shared-map DLF on the same graphs.
pub fn run(c: &mut Criterion) {
    let mut group = c.benchmark_group("dlf_transport");
    group.measurement_time(std::time::Duration::from_secs(2));
    group.sample_size(10);

    for nodes in [64, 256] {
        let graph = generate::random_bounded(nodes, 6, 3).unwrap();
        for algorithm in [Algorithm::Dlf, Algorithm::DlfShared] {
            let config = ReductionConfig::new(algorithm).with_seed(11);
            group.bench_with_input(BenchmarkId::new(algorithm.name(), nodes), &graph, |b, graph| {
                b.iter(|| black_box(reduce_with(graph.deep_copy(), &config).unwrap()));
            });
        }
    }

    group.finish();
}
