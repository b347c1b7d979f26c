//! Forest decomposition: every edge joins exactly one of Δ forests.
//!
//! Each node picks a random offset and spreads the edges to its lower-index
//! neighbors over distinct forest ids. A node therefore owns at most one
//! lower edge per forest, which keeps every forest acyclic.

use std::ops::Range;

use rand::Rng;

use super::{ForestEdge, RoundMessage};
use crate::concurrency::{split_ranges, RoundPool, WorkerCtx};
use crate::error::ProtocolError;
use crate::graph::{Forest, Graph};

/// Worker side: reports a forest assignment for every lower edge of the
/// nodes in `range`.
pub(super) fn assign_edges(
    graph: &Graph,
    worker: &mut WorkerCtx<ForestEdge>,
    range: Range<usize>,
) -> Result<(), ProtocolError> {
    for upper in range {
        let node = graph.node(upper);
        let degree = node.degree();
        if degree == 0 {
            continue;
        }
        let start = worker.rng().gen_range(0..degree);
        for (position, &lower) in node.neighbors().iter().enumerate() {
            if lower >= upper {
                continue;
            }
            let edge = ForestEdge {
                forest: (start + position) % degree,
                lower,
                upper,
            };
            if !worker.emit(edge) {
                return Err(ProtocolError::WorkerLost { worker: worker.id() });
            }
        }
    }
    Ok(())
}

/// Leader side: one decomposition round, then materialization and
/// orientation of every forest.
pub(super) fn decompose(
    graph: &Graph,
    pool: &RoundPool<RoundMessage, ForestEdge>,
) -> Result<Vec<Forest>, ProtocolError> {
    let mut edges = Vec::with_capacity(graph.edge_count());
    let messages = split_ranges(graph.len(), pool.size())
        .into_iter()
        .map(|range| RoundMessage::Decompose { range });
    pool.round(messages, |edge| edges.push(edge))?;

    // Arrival order depends on scheduling; fix it so a pinned seed reproduces.
    edges.sort_unstable_by_key(|e| (e.upper, e.lower));

    let mut forests: Vec<Forest> = (0..graph.max_degree()).map(Forest::new).collect();
    for edge in &edges {
        forests[edge.forest].add_edge(edge.lower, edge.upper);
    }
    for forest in &mut forests {
        forest.orient();
    }
    tracing::trace!(
        edges = edges.len(),
        forests = forests.len(),
        "cv: decomposition settled"
    );
    Ok(forests)
}
