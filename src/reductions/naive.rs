//! Sequential greedy baseline.

use crate::config::RunContext;
use crate::error::{ReductionError, ReductionResult};
use crate::graph::{Color, Graph};
use crate::narrate;

/// Lowest color in `[0, palette)` not held by any neighbor of `index` that
/// `consider` accepts. Neighbors without a color are ignored.
pub(crate) fn lowest_free(
    graph: &Graph,
    index: usize,
    palette: usize,
    consider: impl Fn(usize) -> bool,
) -> Option<Color> {
    let mut taken = vec![false; palette];
    for &n in graph.neighbors(index) {
        if !consider(n) {
            continue;
        }
        if let Some(c) = graph.color(n) {
            if c < palette {
                taken[c] = true;
            }
        }
    }
    taken.iter().position(|&t| !t)
}

/// Number of leading nodes the greedy pass treats as seeded.
fn seed_len(graph: &Graph) -> usize {
    (graph.max_degree() + 1).min(graph.len())
}

/// First-fit colors the leading Δ+1 nodes, establishing the precondition of
/// [`reduce`].
pub fn seed_first_fit(graph: &mut Graph) {
    let palette = graph.max_degree() + 1;
    for index in 0..seed_len(graph) {
        // At most Δ lower neighbors, so a free color always exists.
        let color = lowest_free(graph, index, palette, |n| n < index).unwrap_or(0);
        graph.set_color(index, Some(color));
    }
}

/// Greedy reduction: keeps the colors of the leading Δ+1 nodes and gives every
/// later node the lowest color of `[0, Δ]` its lower-index neighbors leave free.
///
/// # Errors
/// [`ReductionError::MissingSeed`] if a leading node is uncolored,
/// [`ReductionError::ColorSearchExhausted`] if the seed coloring leaves a node
/// no free color.
pub fn reduce(graph: &mut Graph, ctx: &RunContext) -> ReductionResult<()> {
    let seeded = seed_len(graph);
    if let Some(node) = graph.nodes()[..seeded].iter().find(|n| n.color().is_none()) {
        return Err(ReductionError::MissingSeed {
            node: node.name().to_owned(),
        });
    }
    narrate!(ctx.verbosity(), seeded, nodes = graph.len(), "naive: greedy pass");

    let palette = graph.max_degree() + 1;
    for index in seeded..graph.len() {
        let color = lowest_free(graph, index, palette, |n| n < index).ok_or_else(|| {
            ReductionError::ColorSearchExhausted {
                node: graph.node(index).name().to_owned(),
                max_degree: graph.max_degree(),
            }
        })?;
        tracing::trace!(node = graph.node(index).name(), color, "naive: assigned");
        graph.set_color(index, Some(color));
    }
    Ok(())
}
