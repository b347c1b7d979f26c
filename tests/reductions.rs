use distcolor::graph::{generate, Graph};
use distcolor::{reduce, reduce_with, Algorithm, ReductionConfig, ReductionError, Verbosity};

fn seeded(mut graph: Graph) -> Graph {
    graph.seed_identity();
    graph
}

#[test]
fn naive_on_a_four_cycle() {
    let mut graph = generate::cycle(4).unwrap();
    graph.set_colors([0, 1, 2, 3]);
    let (colored, name) = reduce(graph, 0, 0, 0).unwrap();
    assert_eq!(name, "Naive");
    assert!(colored.is_safe());
    assert!(colored.count_colors() <= 3);
}

#[test]
fn kw_colors_a_star_with_two_colors() {
    for leaves in [2, 5, 40] {
        let (colored, name) = reduce(generate::star(leaves).unwrap(), 2, 0, 0).unwrap();
        assert_eq!(name, "KW");
        assert!(colored.is_safe());
        assert_eq!(colored.count_colors(), 2);
    }
}

#[test]
fn unknown_algorithm_is_rejected() {
    let err = reduce(generate::cycle(5).unwrap(), 99, 0, 0).unwrap_err();
    assert_eq!(err, ReductionError::UnknownAlgorithm(99));
}

#[test]
fn linial_lands_in_p_squared() {
    let graph = generate::random_bounded(400, 4, 3).unwrap();
    let (colored, name) = reduce(graph, 5, 0, 0).unwrap();
    assert_eq!(name, "Linial");
    assert!(colored.nodes().iter().all(|n| n.color().unwrap() < 16));
}

#[test]
fn bounded_algorithms_are_proper_on_every_family() {
    let families = [
        generate::cycle(33).unwrap(),
        generate::path(17).unwrap(),
        generate::star(12).unwrap(),
        generate::complete(9).unwrap(),
        generate::random_bounded(120, 5, 21).unwrap(),
        generate::random_bounded(60, 1, 22).unwrap(),
    ];
    for graph in families {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.guarantees_delta_plus_one()) {
            let config = ReductionConfig::new(algorithm).with_seed(5).with_pool_size(3);
            let (colored, _) = reduce_with(seeded(graph.deep_copy()), &config).unwrap();
            assert!(colored.is_safe(), "{algorithm} on {}", graph.name());
            assert!(
                colored.count_colors() <= graph.max_degree() + 1,
                "{algorithm} on {} used {} colors",
                graph.name(),
                colored.count_colors()
            );
        }
    }
}

#[test]
fn pinned_seed_reproduces_cole_vishkin() {
    let graph = generate::random_bounded(90, 4, 6).unwrap();
    let config = ReductionConfig::new(Algorithm::ColeVishkin)
        .with_seed(77)
        .with_pool_size(3)
        .with_verbosity(Verbosity::NARRATE_AND_DUMP);
    let (a, _) = reduce_with(graph.deep_copy(), &config).unwrap();
    let (b, _) = reduce_with(graph.deep_copy(), &config).unwrap();
    assert_eq!(a.colors(), b.colors());
}

#[test]
fn empty_and_edgeless_graphs() {
    let empty = Graph::builder("empty", 0).build().unwrap();
    let lonely = Graph::from_edges("lonely", 0, 5, &[]).unwrap();
    for algorithm in Algorithm::ALL {
        let config = ReductionConfig::new(algorithm).with_seed(1);
        let (colored, _) = reduce_with(seeded(empty.deep_copy()), &config).unwrap();
        assert!(colored.is_empty());
        let (colored, _) = reduce_with(seeded(lonely.deep_copy()), &config).unwrap();
        assert_eq!(colored.count_colors(), 1, "{algorithm}");
    }
}

#[test]
fn linial_starts_from_the_callers_coloring() {
    let mut graph = generate::cycle(4).unwrap();
    graph.set_colors([3, 2, 1, 0]);
    let config = ReductionConfig::new(Algorithm::Linial).with_seed(1);
    let (colored, _) = reduce_with(graph, &config).unwrap();
    assert_eq!(colored.colors(), vec![Some(3), Some(2), Some(1), Some(0)]);
}
