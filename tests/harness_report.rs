use distcolor::graph::generate;
use distcolor::harness::run_one;
use distcolor::{run_suite, Algorithm, ReductionConfig, RunReport, Verbosity};

#[test]
fn config_fills_missing_fields_from_defaults() {
    let config: ReductionConfig = serde_json::from_str(r#"{ "algorithm": "Kw", "seed": 3 }"#).unwrap();
    assert_eq!(config.algorithm, Algorithm::Kw);
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.pool_size, 0);
    assert_eq!(config.verbosity, Verbosity::QUIET);
}

#[test]
fn reports_serialize_with_their_statistics() {
    let graph = generate::star(8).unwrap();
    let reports = run_suite(&graph, &[Algorithm::Kw], &ReductionConfig::default()).unwrap();
    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["name"], "Star_K8_KW");
    assert_eq!(json[0]["colors"], 2);
    assert_eq!(json[0]["is_safe"], true);
    let back: Vec<RunReport> = serde_json::from_value(json).unwrap();
    assert_eq!(back, reports);
}

#[test]
fn run_one_returns_the_colored_copy() {
    let mut graph = generate::cycle(7).unwrap();
    graph.set_colors([6, 5, 4, 3, 2, 1, 0]);
    let config = ReductionConfig::default().with_seed(2);
    let (colored, report) = run_one(&graph, Algorithm::Naive, &config).unwrap();
    assert_eq!(graph.color(0), Some(6));
    assert_eq!(report.colors, colored.count_colors());
    assert!(report.is_safe);
}
