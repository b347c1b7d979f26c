//! Error types for graph construction and reduction runs.
//!
//! Every error aborts the run that raised it; nothing here is retryable.
//! Fallible operations return [`ReductionResult<T>`].

use thiserror::Error;

/// A graph failed validation while being constructed.
///
/// These are always surfaced before any algorithm runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two nodes share a name.
    #[error("node `{name}` is defined more than once")]
    DuplicateNode {
        /// The repeated name.
        name: String,
    },

    /// An adjacency entry names a node that does not exist.
    #[error("node `{node}` lists unknown neighbor `{neighbor}`")]
    UnknownNeighbor {
        /// The node holding the entry.
        node: String,
        /// The unresolved neighbor name.
        neighbor: String,
    },

    /// `from` lists `to` as a neighbor but `to` does not list `from`.
    #[error("edge `{from}` -> `{to}` has no reverse entry")]
    AsymmetricEdge {
        /// The node listing the neighbor.
        from: String,
        /// The neighbor missing the reverse entry.
        to: String,
    },

    /// A node has more neighbors than the declared bound.
    #[error("node `{node}` has degree {degree}, above the bound {max_degree}")]
    DegreeExceeded {
        /// The offending node.
        node: String,
        /// Its neighbor count.
        degree: usize,
        /// The graph's declared bound.
        max_degree: usize,
    },

    /// A node lists itself.
    #[error("node `{node}` lists itself as a neighbor")]
    SelfLoop {
        /// The offending node.
        node: String,
    },

    /// A node lists the same neighbor twice.
    #[error("node `{node}` lists neighbor `{neighbor}` more than once")]
    RepeatedNeighbor {
        /// The node holding the entries.
        node: String,
        /// The repeated neighbor.
        neighbor: String,
    },
}

/// A protocol invariant broke in the middle of a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A forest node and its parent read the same color where the
    /// bit-difference derivation requires them to differ.
    #[error("forest {forest}: node `{node}` and parent `{parent}` both hold color {color}")]
    EqualParentColor {
        /// Forest id.
        forest: usize,
        /// Name of the child node.
        node: String,
        /// Name of the parent node.
        parent: String,
        /// The shared color.
        color: usize,
    },

    /// Every candidate color is held by a neighbor.
    #[error("no free color left for node `{node}` (palette of {palette})")]
    NoFreeColor {
        /// Name of the node being colored.
        node: String,
        /// Size of the palette that was searched.
        palette: usize,
    },

    /// A worker or vertex task hung up before finishing its round.
    #[error("worker {worker} disconnected before finishing its round")]
    WorkerLost {
        /// The worker (or vertex) index.
        worker: usize,
    },
}

/// Unified error type for reduction runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReductionError {
    /// Graph construction failed.
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    /// A mid-run invariant was violated.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// The manager was asked for an algorithm id it does not know.
    #[error("no such algorithm: {0}")]
    UnknownAlgorithm(i64),

    /// A node the naive reducer treats as seeded has no color.
    #[error("seed node `{node}` has no color")]
    MissingSeed {
        /// The uncolored seed node.
        node: String,
    },

    /// The naive reducer found every color in `[0, max_degree]` taken.
    #[error("no color in [0, {max_degree}] is free for node `{node}`; the seed coloring is invalid")]
    ColorSearchExhausted {
        /// The node that could not be colored.
        node: String,
        /// The graph's degree bound.
        max_degree: usize,
    },
}

/// Convenience alias for `Result<T, ReductionError>`.
pub type ReductionResult<T> = Result<T, ReductionError>;
