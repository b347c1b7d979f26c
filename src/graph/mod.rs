//! Graphs, forests and generators the reductions operate on.
//!
//! - `model`: the validated, owned [`Graph`] every run consumes and produces
//! - `forest`: edge-class forests with double-buffered atomic colors
//! - `generate`: reproducible graph families for tests and benchmarks

pub mod forest;
pub mod generate;
pub mod model;

pub use forest::{Buffer, Forest, ForestNode, Slot};
pub use model::{Color, Graph, GraphBuilder, Node};
