//! Run harness: runs reductions on copies of one graph and collects reports.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::ReductionConfig;
use crate::error::ReductionResult;
use crate::graph::Graph;
use crate::reductions::{reduce_with, Algorithm};

/// Statistics from one reduction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// `<graph>_<algorithm>`.
    pub name: String,
    /// Which reduction ran.
    pub algorithm: Algorithm,
    /// Node count.
    pub nodes: usize,
    /// Declared degree bound.
    pub max_degree: usize,
    /// Wall-clock time of the reduction alone.
    pub elapsed: Duration,
    /// Distinct colors in the result.
    pub colors: usize,
    /// Whether the result is a proper coloring.
    pub is_safe: bool,
}

impl RunReport {
    /// CSV header matching [`RunReport::to_csv_row`].
    pub fn csv_header() -> &'static str {
        "name,algorithm,nodes,max_degree,elapsed_ms,colors,is_safe"
    }

    /// This report as one CSV row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.3},{},{}",
            self.name,
            self.algorithm,
            self.nodes,
            self.max_degree,
            self.elapsed.as_secs_f64() * 1000.0,
            self.colors,
            self.is_safe,
        )
    }

    /// Several reports as a complete CSV document.
    pub fn to_csv(reports: &[Self]) -> String {
        let mut csv = Self::csv_header().to_owned();
        for report in reports {
            csv.push('\n');
            csv.push_str(&report.to_csv_row());
        }
        csv
    }
}

/// Runs `algorithm` on a deep copy of `graph` and reports on the result.
///
/// A copy with any uncolored node is given the identity coloring first.
///
/// # Errors
/// Whatever the reduction raises.
pub fn run_one(
    graph: &Graph,
    algorithm: Algorithm,
    config: &ReductionConfig,
) -> ReductionResult<(Graph, RunReport)> {
    let mut copy = graph.deep_copy();
    if copy.nodes().iter().any(|n| n.color().is_none()) {
        copy.seed_identity();
    }
    let config = ReductionConfig {
        algorithm,
        ..config.clone()
    };

    let started = Instant::now();
    let (colored, name) = reduce_with(copy, &config)?;
    let elapsed = started.elapsed();

    let report = RunReport {
        name: format!("{}_{}", graph.name(), name),
        algorithm,
        nodes: colored.len(),
        max_degree: colored.max_degree(),
        elapsed,
        colors: colored.count_colors(),
        is_safe: colored.is_safe(),
    };
    tracing::debug!(
        run = %report.name,
        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
        colors = report.colors,
        safe = report.is_safe,
        "run finished"
    );
    Ok((colored, report))
}

/// Runs each of `algorithms` (all of them when empty) on its own copy of
/// `graph`. `config.algorithm` is ignored.
///
/// # Errors
/// The first error any run raises.
pub fn run_suite(
    graph: &Graph,
    algorithms: &[Algorithm],
    config: &ReductionConfig,
) -> ReductionResult<Vec<RunReport>> {
    let selected = if algorithms.is_empty() {
        &Algorithm::ALL[..]
    } else {
        algorithms
    };
    selected
        .iter()
        .map(|&algorithm| run_one(graph, algorithm, config).map(|(_, report)| report))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate;

    #[test]
    fn suite_leaves_the_input_untouched() {
        let graph = generate::random_bounded(50, 4, 1).unwrap();
        let config = ReductionConfig::default().with_seed(5);
        let reports = run_suite(&graph, &[], &config).unwrap();
        assert_eq!(reports.len(), Algorithm::ALL.len());
        assert!(graph.nodes().iter().all(|n| n.color().is_none()));
        for report in &reports {
            assert_eq!(report.nodes, 50);
            assert!(report.name.starts_with("Graph_N50_D4_"));
            if report.algorithm.guarantees_delta_plus_one() {
                assert!(report.is_safe, "{}", report.name);
                assert!(report.colors <= 5, "{}", report.name);
            }
        }
    }

    #[test]
    fn csv_has_one_row_per_report() {
        let graph = generate::cycle(6).unwrap();
        let reports = run_suite(&graph, &[Algorithm::Naive, Algorithm::Kw], &ReductionConfig::default()).unwrap();
        let csv = RunReport::to_csv(&reports);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().nth(1).unwrap().starts_with("Cycle_N6_Naive,Naive,6,2,"));
    }
}
