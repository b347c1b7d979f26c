//! Run verbosity and the `narrate!` logging macro.
//!
//! Reductions log through `tracing`. A narrating run reports its phases at
//! `info`; a quiet run sends the same events to `debug`. Round-level detail is
//! always `trace`. Installing a subscriber is left to the caller.

use serde::{Deserialize, Serialize};

use crate::graph::Graph;

/// How chatty a run is.
///
/// Odd levels narrate phases; levels of 2 and above also dump the graph
/// before and after the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Output only.
    pub const QUIET: Self = Self(0);
    /// Narrate phases.
    pub const NARRATE: Self = Self(1);
    /// Output plus graph dumps.
    pub const DUMP: Self = Self(2);
    /// Narrate phases and dump graphs.
    pub const NARRATE_AND_DUMP: Self = Self(3);

    /// Wraps a raw level.
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// The raw level.
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Whether phase events are reported at `info`.
    pub const fn narrates(self) -> bool {
        self.0 % 2 == 1
    }

    /// Whether graphs are dumped around a run.
    pub const fn dumps_graph(self) -> bool {
        self.0 >= 2
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Self(level)
    }
}

/// Emits a phase event at `info` when the verbosity narrates, `debug` otherwise.
///
/// ```
/// use distcolor::logging::Verbosity;
///
/// let verbosity = Verbosity::NARRATE;
/// distcolor::narrate!(verbosity, nodes = 4, "starting reduction");
/// ```
#[macro_export]
macro_rules! narrate {
    ($verbosity:expr, $($arg:tt)+) => {
        if $verbosity.narrates() {
            ::tracing::info!($($arg)+)
        } else {
            ::tracing::debug!($($arg)+)
        }
    };
}

/// Logs every node of `graph` at `info` if `verbosity` asks for graph dumps.
pub fn dump_graph(graph: &Graph, verbosity: Verbosity) {
    if !verbosity.dumps_graph() {
        return;
    }
    tracing::info!(
        graph = graph.name(),
        description = graph.description(),
        max_degree = graph.max_degree(),
        "graph dump"
    );
    for node in graph.nodes() {
        let neighbors: Vec<&str> = graph.neighbor_names(node.index()).collect();
        tracing::info!(node = node.name(), color = ?node.color(), ?neighbors);
    }
}
