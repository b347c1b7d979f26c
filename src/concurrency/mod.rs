//! Round-synchronization substrate shared by the reductions.
//!
//! - `pool`: leader-driven worker pool with a per-round completion barrier
//! - `barrier`: a reusable barrier whose parties can retire
//! - `scoped`: parallel compute phase followed by an exclusive commit phase

pub mod barrier;
pub mod pool;
pub mod scoped;

pub use barrier::RoundBarrier;
pub use pool::{pool_size, split_ranges, RoundPool, Signal, WorkerCtx};
pub use scoped::{map_then_commit, parallel_read_then_commit};
