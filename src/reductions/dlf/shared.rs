//! DLF over one shared board keyed by node name.
//!
//! A round has three barrier-separated phases: publish (write priority and
//! proposal), compare (read live neighbors, flag acceptance) and commit
//! (absorb accepted neighbors). Nothing is written during commit, and nothing
//! is read during publish.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{join, Priority, Vertex};
use crate::concurrency::RoundBarrier;
use crate::config::RunContext;
use crate::error::ProtocolError;
use crate::graph::{Color, Graph};

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    priority: Option<Priority>,
    color: Color,
    accepted: bool,
}

type Board = Mutex<HashMap<String, Entry>>;

fn lock(board: &Board) -> MutexGuard<'_, HashMap<String, Entry>> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

fn vertex_task(
    graph: &Graph,
    ctx: &RunContext,
    index: usize,
    board: &Board,
    barrier: &RoundBarrier,
) -> Result<Color, ProtocolError> {
    let mut vertex = Vertex::new(graph, index, ctx);
    let name = graph.node(index).name();
    let mut round = 0_usize;
    loop {
        let priority = vertex.priority();
        let color = vertex.proposal(graph)?;
        if let Some(entry) = lock(board).get_mut(name) {
            *entry = Entry {
                priority: Some(priority),
                color,
                accepted: false,
            };
        }
        barrier.wait();

        let accepted = {
            let board = lock(board);
            vertex.live.iter().all(|&u| {
                board
                    .get(graph.node(u).name())
                    .map_or(true, |theirs| theirs.priority < Some(priority))
            })
        };
        if accepted {
            if let Some(entry) = lock(board).get_mut(name) {
                entry.accepted = true;
            }
        }
        barrier.wait();

        let retired: Vec<(usize, Color)> = {
            let board = lock(board);
            vertex
                .live
                .iter()
                .filter_map(|&u| {
                    board
                        .get(graph.node(u).name())
                        .filter(|theirs| theirs.accepted)
                        .map(|theirs| (u, theirs.color))
                })
                .collect()
        };
        for (u, theirs) in retired {
            vertex.absorb(u, theirs);
        }

        if accepted {
            tracing::trace!(vertex = index, round, color, "dlf-shared: claimed");
            return Ok(color);
        }
        vertex.burn(color);
        barrier.wait();
        round += 1;
    }
}

/// Runs one task per vertex against a shared board and returns the colors
/// in node order.
pub(super) fn run(graph: &Graph, ctx: &RunContext) -> Result<Vec<Color>, ProtocolError> {
    let board: Board = Mutex::new(
        graph
            .nodes()
            .iter()
            .map(|n| (n.name().to_owned(), Entry::default()))
            .collect(),
    );
    let barrier = RoundBarrier::new(graph.len());
    std::thread::scope(|scope| {
        let (board, barrier) = (&board, &barrier);
        let handles: Vec<_> = (0..graph.len())
            .map(|index| {
                scope.spawn(move || {
                    let outcome = vertex_task(graph, ctx, index, board, barrier);
                    barrier.leave();
                    outcome
                })
            })
            .collect();
        handles.into_iter().map(join).collect()
    })
}
