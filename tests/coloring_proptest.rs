use distcolor::graph::{generate, Graph};
use distcolor::{reduce_with, Algorithm, ReductionConfig};
use proptest::prelude::*;

fn bounded_graph() -> impl Strategy<Value = Graph> {
    (2_usize..80, 1_usize..7, any::<u64>())
        .prop_map(|(nodes, max_degree, seed)| generate::random_bounded(nodes, max_degree, seed).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn bounded_reductions_stay_within_delta_plus_one(
        graph in bounded_graph(),
        seed in any::<u64>(),
        pool in 0_i64..6,
    ) {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.guarantees_delta_plus_one()) {
            let mut input = graph.deep_copy();
            input.seed_identity();
            let config = ReductionConfig::new(algorithm).with_seed(seed).with_pool_size(pool);
            let (colored, _) = reduce_with(input, &config).unwrap();
            prop_assert!(colored.is_safe(), "{} left a conflict", algorithm);
            prop_assert!(colored.count_colors() <= graph.max_degree() + 1);
        }
    }

    #[test]
    fn linial_palette_is_p_squared(graph in bounded_graph()) {
        let config = ReductionConfig::new(Algorithm::Linial).with_seed(0);
        let (colored, _) = reduce_with(graph.deep_copy(), &config).unwrap();
        let p = graph.max_degree().max(1);
        for node in colored.nodes() {
            prop_assert!(node.color().unwrap() < p * p);
        }
    }
}
