//! Cole–Vishkin: forest decomposition, deterministic 6-coloring per forest,
//! randomized down-shift to 3 colors, and unification into a Δ+1 coloring.
//!
//! The leader drives a [`RoundPool`] through one [`RoundMessage`] per worker
//! per round. Workers own a stride of forest slots; they read the buffer the
//! previous round settled and write the other one, and the leader flips
//! `CvRun::active` once the round's barrier completes.

mod decompose;
mod unify;

use std::ops::Range;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::concurrency::{RoundPool, WorkerCtx};
use crate::config::RunContext;
use crate::error::{ProtocolError, ReductionResult};
use crate::graph::{Buffer, Forest, Graph, Slot};
use crate::narrate;

/// Bit index a root derives its next color from, standing in for the
/// comparison with a parent it does not have.
const ROOT_INDEX: u32 = 0;

/// Thresholds for the three down-shift rounds: the palette size entering
/// each round.
const DOWN_SHIFT: [usize; 3] = [6, 5, 4];

/// A worker's share of a forest: slots `start, start + step, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride {
    /// First slot.
    pub start: usize,
    /// Distance between slots.
    pub step: usize,
}

impl Stride {
    fn slots(self, len: usize) -> impl Iterator<Item = Slot> {
        (self.start..len).step_by(self.step.max(1))
    }
}

/// One phase command for one worker.
#[derive(Debug)]
pub enum RoundMessage {
    /// Assign the lower edges of nodes in `range` to forests.
    Decompose {
        /// Node indices.
        range: Range<usize>,
    },
    /// One bit-difference round.
    Derive {
        /// Target forest.
        forest: Arc<Forest>,
        /// Slots handled by this worker.
        stride: Stride,
        /// Buffer receiving the new colors.
        write: Buffer,
    },
    /// Down-shift proposal: roots pick a fresh color, others adopt the parent's.
    Propose {
        /// Target forest.
        forest: Arc<Forest>,
        /// Slots handled by this worker.
        stride: Stride,
        /// Buffer receiving the proposals.
        write: Buffer,
    },
    /// Down-shift repair of proposals at the top of the palette.
    Repair {
        /// Target forest.
        forest: Arc<Forest>,
        /// Slots handled by this worker.
        stride: Stride,
        /// Buffer holding the proposals.
        write: Buffer,
        /// Palette size entering the round.
        threshold: usize,
    },
}

/// An edge assigned to a forest during decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ForestEdge {
    /// Forest id.
    pub forest: usize,
    /// Lower-index endpoint.
    pub lower: usize,
    /// Higher-index endpoint.
    pub upper: usize,
}

/// Per-invocation protocol state.
#[derive(Debug, Clone, Copy)]
struct CvRun {
    /// Buffer holding the colors the last completed round settled.
    active: Buffer,
}

/// A forest together with the buffer its final colors settled in.
#[derive(Debug)]
pub struct ColoredForest {
    forest: Arc<Forest>,
    settled: Buffer,
}

impl ColoredForest {
    /// The forest.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Buffer holding the authoritative colors.
    pub fn settled(&self) -> Buffer {
        self.settled
    }

    /// Final color of `slot`.
    pub fn color(&self, slot: Slot) -> usize {
        self.forest.node(slot).color(self.settled)
    }
}

/// Number of bit-difference rounds for a forest of `len` nodes:
/// `log*(len) + 3`.
pub fn derive_rounds(len: usize) -> usize {
    let mut n = len;
    let mut rounds = 0;
    while n > 1 {
        n = (usize::BITS - (n - 1).leading_zeros()) as usize;
        rounds += 1;
    }
    rounds + 3
}

fn handle(
    graph: &Graph,
    worker: &mut WorkerCtx<ForestEdge>,
    message: RoundMessage,
) -> Result<(), ProtocolError> {
    match message {
        RoundMessage::Decompose { range } => decompose::assign_edges(graph, worker, range),
        RoundMessage::Derive {
            forest,
            stride,
            write,
        } => derive(graph, &forest, stride, write),
        RoundMessage::Propose {
            forest,
            stride,
            write,
        } => {
            propose(&forest, stride, write, worker.rng());
            Ok(())
        }
        RoundMessage::Repair {
            forest,
            stride,
            write,
            threshold,
        } => repair(graph, &forest, stride, write, threshold, worker.rng()),
    }
}

/// Bit-difference step: a node keeps the lowest differing bit index against
/// its parent, and its own value at that bit.
fn derive(graph: &Graph, forest: &Forest, stride: Stride, write: Buffer) -> Result<(), ProtocolError> {
    let read = write.flip();
    for slot in stride.slots(forest.len()) {
        let node = forest.node(slot);
        let own = node.color(read);
        let index = match node.parent() {
            Some(parent) => {
                let theirs = forest.node(parent).color(read);
                if own == theirs {
                    return Err(ProtocolError::EqualParentColor {
                        forest: forest.id(),
                        node: graph.node(node.origin()).name().to_owned(),
                        parent: graph.node(forest.node(parent).origin()).name().to_owned(),
                        color: own,
                    });
                }
                (own ^ theirs).trailing_zeros()
            }
            None => ROOT_INDEX,
        };
        node.store(write, ((index as usize) << 1) | ((own >> index) & 1));
    }
    Ok(())
}

fn propose(forest: &Forest, stride: Stride, write: Buffer, rng: &mut SmallRng) {
    let read = write.flip();
    for slot in stride.slots(forest.len()) {
        let node = forest.node(slot);
        let next = match node.parent() {
            Some(parent) => forest.node(parent).color(read),
            None => {
                let own = node.color(read);
                let choices: Vec<usize> = (0..3).filter(|&c| c != own).collect();
                // At most one of three colors is excluded.
                choices.choose(rng).copied().unwrap_or_default()
            }
        };
        node.store(write, next);
    }
}

fn repair(
    graph: &Graph,
    forest: &Forest,
    stride: Stride,
    write: Buffer,
    threshold: usize,
    rng: &mut SmallRng,
) -> Result<(), ProtocolError> {
    for slot in stride.slots(forest.len()) {
        let node = forest.node(slot);
        if node.color(write) + 1 < threshold {
            continue;
        }
        let mut free = [true; 3];
        for &peer in node.neighbors() {
            if let Some(f) = free.get_mut(forest.node(peer).color(write)) {
                *f = false;
            }
        }
        let options: Vec<usize> = (0..3).filter(|&c| free[c]).collect();
        let color = options
            .choose(rng)
            .copied()
            .ok_or_else(|| ProtocolError::NoFreeColor {
                node: graph.node(node.origin()).name().to_owned(),
                palette: 3,
            })?;
        node.store(write, color);
    }
    Ok(())
}

fn strides(size: usize) -> impl Iterator<Item = Stride> {
    (0..size).map(move |start| Stride { start, step: size })
}

/// Reduces one forest to a proper 3-coloring of its trees.
fn reduce_forest(
    pool: &RoundPool<RoundMessage, ForestEdge>,
    forest: Arc<Forest>,
) -> Result<ColoredForest, ProtocolError> {
    let mut run = CvRun {
        active: Buffer::Primary,
    };
    if !forest.needs_reduction() {
        return Ok(ColoredForest {
            forest,
            settled: run.active,
        });
    }

    let size = pool.size();
    let rounds = derive_rounds(forest.len());
    for round in 0..rounds {
        let write = run.active.flip();
        pool.round(
            strides(size).map(|stride| RoundMessage::Derive {
                forest: Arc::clone(&forest),
                stride,
                write,
            }),
            drop,
        )?;
        run.active = write;
        tracing::trace!(forest = forest.id(), round, "cv: derive round done");
    }

    for threshold in DOWN_SHIFT {
        let write = run.active.flip();
        pool.round(
            strides(size).map(|stride| RoundMessage::Propose {
                forest: Arc::clone(&forest),
                stride,
                write,
            }),
            drop,
        )?;
        pool.round(
            strides(size).map(|stride| RoundMessage::Repair {
                forest: Arc::clone(&forest),
                stride,
                write,
                threshold,
            }),
            drop,
        )?;
        run.active = write;
        tracing::trace!(forest = forest.id(), threshold, "cv: down-shift round done");
    }

    Ok(ColoredForest {
        forest,
        settled: run.active,
    })
}

/// Decomposes `graph` into Δ forests and 3-colors each of them on a pool of
/// `pool_size` workers. Graph colors are not touched.
///
/// # Errors
/// Any [`ProtocolError`] a worker raises.
pub fn three_color(graph: &Graph, ctx: &RunContext, pool_size: usize) -> ReductionResult<Vec<ColoredForest>> {
    std::thread::scope(|scope| -> ReductionResult<Vec<ColoredForest>> {
        let pool = RoundPool::<RoundMessage, ForestEdge>::spawn(
            scope,
            pool_size,
            ctx,
            move |worker, message| handle(graph, worker, message),
        );
        let forests = decompose::decompose(graph, &pool)?;
        narrate!(
            ctx.verbosity(),
            forests = forests.len(),
            workers = pool.size(),
            "cv: decomposed"
        );
        let mut colored = Vec::with_capacity(forests.len());
        for forest in forests {
            colored.push(reduce_forest(&pool, Arc::new(forest))?);
        }
        Ok(colored)
    })
}

/// Cole–Vishkin reduction to at most Δ+1 colors.
///
/// # Errors
/// Any [`ProtocolError`] raised while coloring the forests or unifying them.
pub fn reduce(graph: &mut Graph, ctx: &RunContext, pool_size: usize) -> ReductionResult<()> {
    let forests = three_color(graph, ctx, pool_size)?;
    narrate!(ctx.verbosity(), "cv: forests 3-colored, unifying");
    let mut rng = ctx.rng(RunContext::UNIFIER_STREAM);
    unify::unify(graph, &forests, &mut rng)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate;
    use crate::logging::Verbosity;
    use rand::SeedableRng;

    fn chain(len: usize) -> Forest {
        let mut f = Forest::new(0);
        for upper in 1..len {
            f.add_edge(upper - 1, upper);
        }
        f.orient();
        f
    }

    #[test]
    fn round_count_grows_like_log_star() {
        assert_eq!(derive_rounds(1), 3);
        assert_eq!(derive_rounds(2), 4);
        assert_eq!(derive_rounds(16), 6);
        assert_eq!(derive_rounds(65_536), 7);
    }

    #[test]
    fn derive_converges_to_six_colors() {
        let graph = generate::path(200).unwrap();
        let forest = chain(200);
        let mut active = Buffer::Primary;
        for _ in 0..derive_rounds(forest.len()) {
            let write = active.flip();
            derive(&graph, &forest, Stride { start: 0, step: 1 }, write).unwrap();
            active = write;
        }
        for node in forest.nodes() {
            assert!(node.color(active) < 6);
            if let Some(p) = node.parent() {
                assert_ne!(node.color(active), forest.node(p).color(active));
            }
        }
    }

    #[test]
    fn equal_parent_color_is_fatal() {
        let graph = generate::path(3).unwrap();
        let forest = chain(3);
        for node in forest.nodes() {
            node.store(Buffer::Primary, 4);
        }
        let err = derive(&graph, &forest, Stride { start: 0, step: 1 }, Buffer::Scratch).unwrap_err();
        assert!(matches!(err, ProtocolError::EqualParentColor { color: 4, .. }));
    }

    #[test]
    fn down_shift_reaches_three_colors() {
        let graph = generate::path(64).unwrap();
        let forest = chain(64);
        let mut rng = SmallRng::seed_from_u64(3);
        let all = Stride { start: 0, step: 1 };
        let mut active = Buffer::Primary;
        for _ in 0..derive_rounds(forest.len()) {
            let write = active.flip();
            derive(&graph, &forest, all, write).unwrap();
            active = write;
        }
        for threshold in DOWN_SHIFT {
            let write = active.flip();
            propose(&forest, all, write, &mut rng);
            repair(&graph, &forest, all, write, threshold, &mut rng).unwrap();
            active = write;
        }
        for node in forest.nodes() {
            assert!(node.color(active) < 3);
            if let Some(p) = node.parent() {
                assert_ne!(node.color(active), forest.node(p).color(active));
            }
        }
    }

    #[test]
    fn reduce_is_proper_within_delta_plus_one() {
        let mut graph = generate::random_bounded(120, 6, 5).unwrap();
        let ctx = RunContext::new(9, Verbosity::QUIET);
        reduce(&mut graph, &ctx, 4).unwrap();
        assert!(graph.is_safe());
        assert!(graph.count_colors() <= 7);
    }
}
