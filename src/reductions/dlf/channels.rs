//! DLF over per-edge channels.
//!
//! Every directed edge carries two unbounded channels: one for the round's
//! proposal and one for the verdict that follows it. A vertex only ever waits
//! on neighbors it still considers live, and neighbors leave that set in the
//! same round on both ends.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{join, Priority, Vertex};
use crate::concurrency::RoundBarrier;
use crate::config::RunContext;
use crate::error::ProtocolError;
use crate::graph::{Color, Graph};

/// `Some(color)` when the sender claimed `color` this round.
type Verdict = Option<Color>;

#[derive(Default)]
struct Links {
    to: HashMap<usize, (Sender<Priority>, Sender<Verdict>)>,
    from: HashMap<usize, (Receiver<Priority>, Receiver<Verdict>)>,
}

impl Links {
    fn propose(&self, neighbor: usize, proposal: Priority) -> Result<(), ProtocolError> {
        self.to
            .get(&neighbor)
            .and_then(|(tx, _)| tx.send(proposal).ok())
            .ok_or(ProtocolError::WorkerLost { worker: neighbor })
    }

    fn judge(&self, neighbor: usize, verdict: Verdict) -> Result<(), ProtocolError> {
        self.to
            .get(&neighbor)
            .and_then(|(_, tx)| tx.send(verdict).ok())
            .ok_or(ProtocolError::WorkerLost { worker: neighbor })
    }

    fn proposal_from(&self, neighbor: usize) -> Result<Priority, ProtocolError> {
        self.from
            .get(&neighbor)
            .and_then(|(rx, _)| rx.recv().ok())
            .ok_or(ProtocolError::WorkerLost { worker: neighbor })
    }

    fn verdict_from(&self, neighbor: usize) -> Result<Verdict, ProtocolError> {
        self.from
            .get(&neighbor)
            .and_then(|(_, rx)| rx.recv().ok())
            .ok_or(ProtocolError::WorkerLost { worker: neighbor })
    }
}

fn wire(graph: &Graph) -> Vec<Links> {
    let mut links: Vec<Links> = (0..graph.len()).map(|_| Links::default()).collect();
    for (a, b) in graph.edges() {
        for (from, to) in [(a, b), (b, a)] {
            let (proposal_tx, proposal_rx) = unbounded();
            let (verdict_tx, verdict_rx) = unbounded();
            links[from].to.insert(to, (proposal_tx, verdict_tx));
            links[to].from.insert(from, (proposal_rx, verdict_rx));
        }
    }
    links
}

fn vertex_task(
    graph: &Graph,
    ctx: &RunContext,
    index: usize,
    links: &Links,
    barrier: &RoundBarrier,
) -> Result<Color, ProtocolError> {
    let mut vertex = Vertex::new(graph, index, ctx);
    let mut round = 0_usize;
    loop {
        let priority = vertex.priority();
        let color = vertex.proposal(graph)?;
        for &u in &vertex.live {
            links.propose(u, priority)?;
        }

        let mut accepted = true;
        for &u in &vertex.live {
            if links.proposal_from(u)? > priority {
                accepted = false;
            }
        }

        let verdict = accepted.then_some(color);
        for &u in &vertex.live {
            links.judge(u, verdict)?;
        }
        let mut retired = Vec::new();
        for &u in &vertex.live {
            if let Some(theirs) = links.verdict_from(u)? {
                retired.push((u, theirs));
            }
        }
        for (u, theirs) in retired {
            vertex.absorb(u, theirs);
        }

        if accepted {
            tracing::trace!(vertex = index, round, color, "dlf: claimed");
            return Ok(color);
        }
        vertex.burn(color);
        barrier.wait();
        round += 1;
    }
}

/// Runs one task per vertex and returns the colors in node order.
pub(super) fn run(graph: &Graph, ctx: &RunContext) -> Result<Vec<Color>, ProtocolError> {
    let barrier = RoundBarrier::new(graph.len());
    let links = wire(graph);
    std::thread::scope(|scope| {
        let barrier = &barrier;
        let handles: Vec<_> = links
            .into_iter()
            .enumerate()
            .map(|(index, links)| {
                scope.spawn(move || {
                    let outcome = vertex_task(graph, ctx, index, &links, barrier);
                    barrier.leave();
                    outcome
                })
            })
            .collect();
        handles.into_iter().map(join).collect()
    })
}
