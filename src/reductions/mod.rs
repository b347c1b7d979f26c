//! Coloring reductions and the manager that dispatches between them.
//!
//! Every reducer takes a graph it exclusively owns and leaves its result in
//! the node colors. [`reduce`] is the id-based entry point; [`reduce_with`]
//! takes a full [`ReductionConfig`].

pub mod cole_vishkin;
pub mod dlf;
pub mod kuhn_wattenhofer;
pub mod linial;
pub mod naive;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concurrency::pool_size;
use crate::config::ReductionConfig;
use crate::error::{ReductionError, ReductionResult};
use crate::graph::Graph;
use crate::logging::{dump_graph, Verbosity};
use crate::narrate;

/// The reductions the manager knows, with their stable ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Sequential greedy baseline (id 0).
    Naive,
    /// Cole–Vishkin forest reduction (id 1).
    ColeVishkin,
    /// Kuhn–Wattenhofer binning (id 2).
    Kw,
    /// Distributed Largest-First over per-edge channels (id 3).
    Dlf,
    /// Distributed Largest-First over a shared map (id 4).
    DlfShared,
    /// Linial refinement (id 5).
    Linial,
}

impl Algorithm {
    /// Every algorithm in id order.
    pub const ALL: [Self; 6] = [
        Self::Naive,
        Self::ColeVishkin,
        Self::Kw,
        Self::Dlf,
        Self::DlfShared,
        Self::Linial,
    ];

    /// Resolves a manager id.
    ///
    /// # Errors
    /// [`ReductionError::UnknownAlgorithm`] for ids outside `0..=5`.
    pub fn from_id(id: i64) -> ReductionResult<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ReductionError::UnknownAlgorithm(id))
    }

    /// The manager id.
    pub fn id(self) -> i64 {
        match self {
            Self::Naive => 0,
            Self::ColeVishkin => 1,
            Self::Kw => 2,
            Self::Dlf => 3,
            Self::DlfShared => 4,
            Self::Linial => 5,
        }
    }

    /// Display name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Naive => "Naive",
            Self::ColeVishkin => "CV",
            Self::Kw => "KW",
            Self::Dlf => "DLF",
            Self::DlfShared => "DLF-Shared",
            Self::Linial => "Linial",
        }
    }

    /// Whether the result is guaranteed proper with at most Δ+1 colors.
    pub fn guarantees_delta_plus_one(self) -> bool {
        !matches!(self, Self::Linial)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs algorithm `id` on `graph` with a fresh seed.
///
/// `pool_size <= 0` selects the default worker count. Returns the colored
/// graph and the algorithm's name.
///
/// # Errors
/// [`ReductionError::UnknownAlgorithm`] for an unknown id, otherwise whatever
/// the reduction raises.
pub fn reduce(
    graph: Graph,
    id: i64,
    pool_size: i64,
    verbosity: u8,
) -> ReductionResult<(Graph, &'static str)> {
    let config = ReductionConfig::new(Algorithm::from_id(id)?)
        .with_pool_size(pool_size)
        .with_verbosity(Verbosity::new(verbosity));
    reduce_with(graph, &config)
}

/// Runs the reduction `config` describes on `graph`.
///
/// # Errors
/// Whatever the reduction raises.
pub fn reduce_with(
    mut graph: Graph,
    config: &ReductionConfig,
) -> ReductionResult<(Graph, &'static str)> {
    let ctx = config.context();
    let algorithm = config.algorithm;
    narrate!(
        ctx.verbosity(),
        graph = graph.name(),
        %algorithm,
        seed = ctx.seed(),
        "reduction starting"
    );
    dump_graph(&graph, ctx.verbosity());

    match algorithm {
        Algorithm::Naive => naive::reduce(&mut graph, &ctx)?,
        Algorithm::ColeVishkin => {
            let workers = pool_size(graph.len(), config.pool_size);
            cole_vishkin::reduce(&mut graph, &ctx, workers)?;
        }
        Algorithm::Kw => kuhn_wattenhofer::reduce(&mut graph, &ctx)?,
        Algorithm::Dlf => dlf::reduce(&mut graph, &ctx, dlf::Transport::Channels)?,
        Algorithm::DlfShared => dlf::reduce(&mut graph, &ctx, dlf::Transport::Shared)?,
        Algorithm::Linial => linial::reduce(&mut graph, &ctx)?,
    }

    narrate!(
        ctx.verbosity(),
        %algorithm,
        colors = graph.count_colors(),
        safe = graph.is_safe(),
        "reduction finished"
    );
    dump_graph(&graph, ctx.verbosity());
    Ok((graph, algorithm.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate;

    #[test]
    fn ids_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_id(algorithm.id()), Ok(algorithm));
        }
        assert_eq!(Algorithm::from_id(-1), Err(ReductionError::UnknownAlgorithm(-1)));
        assert_eq!(Algorithm::from_id(6), Err(ReductionError::UnknownAlgorithm(6)));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let g = generate::cycle(5).unwrap();
        assert_eq!(reduce(g, 99, 0, 0).unwrap_err(), ReductionError::UnknownAlgorithm(99));
    }

    #[test]
    fn names_follow_ids() {
        let names: Vec<_> = Algorithm::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["Naive", "CV", "KW", "DLF", "DLF-Shared", "Linial"]);
    }
}
