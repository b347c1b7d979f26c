//! # `distcolor` - Round-Synchronous Graph-Coloring Reductions
//!
//! Parallel and distributed-style graph-coloring reductions over arbitrary
//! undirected graphs, run side by side with a sequential greedy baseline so
//! their round counts and color counts can be compared.
//!
//! ## Guarantees
//!
//! ### Coloring
//! - **Δ+1 bound**: Naive, Cole–Vishkin, Kuhn–Wattenhofer and both DLF
//!   transports always produce a proper coloring with at most Δ+1 colors.
//! - **Linial**: refines an n-coloring into the palette `[0, p²)` with `p = max(Δ, 1)`;
//!   properness is not guaranteed.
//!
//! ### Concurrency
//! - **Round barriers**: no task observes another task's round-R writes before
//!   round R completes for everyone.
//! - **No shared globals**: every run carries its own seed, verbosity and
//!   protocol state, so independent runs may proceed concurrently.
//! - **Private randomness**: every worker and vertex task owns an
//!   independently seeded generator.
//!
//! ## Architecture
//!
//! 1. **Graph model** (`Graph`, `Node`): validated on construction, owned by
//!    exactly one run; `deep_copy` hands each run its own copy.
//! 2. **Forests** (`Forest`, `ForestNode`): arena-allocated edge classes with
//!    double-buffered atomic colors.
//! 3. **Concurrency substrate**: a leader-driven `RoundPool`, a shrinking
//!    `RoundBarrier`, and read-then-commit helpers over rayon.
//! 4. **Reductions**: one module per algorithm, dispatched by id through
//!    [`reductions::reduce`].
//! 5. **Harness**: timed runs on graph copies, reported as `RunReport`s.
//!
//! ## Example
//!
//! ```rust
//! use distcolor::graph::generate;
//! use distcolor::reductions;
//!
//! let graph = generate::random_bounded(64, 4, 7).unwrap();
//!
//! // Algorithm 3 is DLF over per-edge channels.
//! let (colored, name) = reductions::reduce(graph, 3, 0, 0).unwrap();
//! assert_eq!(name, "DLF");
//! assert!(colored.is_safe());
//! assert!(colored.count_colors() <= 5);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod config;
pub mod error;
pub mod graph;
pub mod harness;
pub mod logging;
pub mod reductions;

pub use config::{ReductionConfig, RunContext};
pub use error::{GraphError, ProtocolError, ReductionError, ReductionResult};
pub use graph::{Forest, ForestNode, Graph, GraphBuilder, Node};
pub use harness::{run_suite, RunReport};
pub use logging::Verbosity;
pub use reductions::{reduce, reduce_with, Algorithm};

// Compile-time checks on small value types passed through channels.
const _: () = {
    use core::mem;

    assert!(mem::size_of::<Verbosity>() == 1);
    assert!(mem::size_of::<graph::Buffer>() == 1);
    assert!(Algorithm::ALL.len() == 6);
};
