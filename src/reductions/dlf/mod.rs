//! Distributed Largest-First: one task per vertex, locally maximal vertices
//! claim their first available color each round.
//!
//! Two transports carry the per-round exchange:
//! - [`Transport::Channels`]: dedicated per-edge channels (the canonical form)
//! - [`Transport::Shared`]: one name-keyed map behind a mutex, kept so the two
//!   can be benchmarked against each other
//!
//! Both end every round on a [`RoundBarrier`](crate::concurrency::RoundBarrier)
//! that vertices leave as they retire.

mod channels;
mod shared;

use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RunContext;
use crate::error::{ProtocolError, ReductionResult};
use crate::graph::{Color, Graph};
use crate::narrate;

/// How vertex tasks exchange proposals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    /// Per-edge channels.
    #[default]
    Channels,
    /// A mutex-guarded map keyed by node name.
    Shared,
}

/// Total order deciding who claims first: higher degree, then higher random
/// tie-break, then higher index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Priority {
    degree: usize,
    tiebreak: u64,
    index: usize,
}

/// Private state of one vertex task.
#[derive(Debug)]
struct Vertex {
    index: usize,
    degree: usize,
    palette: BTreeSet<Color>,
    live: BTreeSet<usize>,
    rng: SmallRng,
}

impl Vertex {
    fn new(graph: &Graph, index: usize, ctx: &RunContext) -> Self {
        Self {
            index,
            degree: graph.node(index).degree(),
            palette: (0..=graph.max_degree()).collect(),
            live: graph.neighbors(index).iter().copied().collect(),
            rng: ctx.rng(RunContext::VERTEX_STREAM ^ index as u64),
        }
    }

    /// Draws this round's priority.
    fn priority(&mut self) -> Priority {
        Priority {
            degree: self.degree,
            tiebreak: self.rng.gen(),
            index: self.index,
        }
    }

    /// The color this vertex proposes: its lowest available one.
    fn proposal(&self, graph: &Graph) -> Result<Color, ProtocolError> {
        self.palette
            .first()
            .copied()
            .ok_or_else(|| ProtocolError::NoFreeColor {
                node: graph.node(self.index).name().to_owned(),
                palette: graph.max_degree() + 1,
            })
    }

    /// A live neighbor retired holding `color`.
    fn absorb(&mut self, neighbor: usize, color: Color) {
        self.palette.remove(&color);
        self.live.remove(&neighbor);
    }

    /// Drops a rejected proposal from the palette if enough colors remain for
    /// every live neighbor to retire first.
    fn burn(&mut self, color: Color) {
        if self.palette.len() > self.live.len() + 1 {
            self.palette.remove(&color);
        }
    }
}

/// Joins a vertex task, re-raising its panic on the caller.
fn join<T>(handle: std::thread::ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// DLF reduction to at most Δ+1 colors over `transport`.
///
/// # Errors
/// [`ProtocolError::WorkerLost`] if a vertex task hangs up mid-round,
/// [`ProtocolError::NoFreeColor`] if a palette runs dry.
pub fn reduce(graph: &mut Graph, ctx: &RunContext, transport: Transport) -> ReductionResult<()> {
    narrate!(
        ctx.verbosity(),
        vertices = graph.len(),
        ?transport,
        "dlf: spawning vertex tasks"
    );
    let colors = match transport {
        Transport::Channels => channels::run(graph, ctx)?,
        Transport::Shared => shared::run(graph, ctx)?,
    };
    for (index, color) in colors.into_iter().enumerate() {
        graph.set_color(index, Some(color));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate;
    use crate::logging::Verbosity;

    #[test]
    fn priority_orders_degree_first() {
        let low = Priority { degree: 1, tiebreak: u64::MAX, index: 9 };
        let high = Priority { degree: 2, tiebreak: 0, index: 0 };
        assert!(high > low);
        let a = Priority { degree: 2, tiebreak: 5, index: 0 };
        let b = Priority { degree: 2, tiebreak: 5, index: 1 };
        assert!(b > a);
    }

    #[test]
    fn burn_keeps_room_for_live_neighbors() {
        let g = generate::star(3).unwrap();
        let ctx = RunContext::new(1, Verbosity::QUIET);
        let mut hub = Vertex::new(&g, 0, &ctx);
        hub.burn(0);
        assert_eq!(hub.palette.len(), 4);
        hub.absorb(1, 1);
        assert_eq!(hub.proposal(&g), Ok(0));

        let mut leaf = Vertex::new(&g, 1, &ctx);
        leaf.burn(0);
        leaf.burn(1);
        leaf.burn(2);
        assert_eq!(leaf.palette.len(), 2);
        assert_eq!(leaf.proposal(&g), Ok(2));
    }

    #[test]
    fn both_transports_color_properly() {
        for transport in [Transport::Channels, Transport::Shared] {
            let mut g = generate::random_bounded(40, 4, 2).unwrap();
            let ctx = RunContext::new(17, Verbosity::QUIET);
            reduce(&mut g, &ctx, transport).unwrap();
            assert!(g.is_safe(), "{transport:?}");
            assert!(g.count_colors() <= 5, "{transport:?}");
        }
    }
}
