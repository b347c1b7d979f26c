//! Run configuration and per-invocation context.
//!
//! Nothing here is process-global: every run carries its own seed and
//! verbosity, so independent runs can proceed side by side and tests can pin
//! the seed.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::logging::Verbosity;
use crate::reductions::Algorithm;

/// Configuration for one reduction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    /// Which reduction to run.
    pub algorithm: Algorithm,
    /// Requested worker count; `<= 0` selects `floor(sqrt(|nodes|))`.
    pub pool_size: i64,
    /// Logging verbosity.
    pub verbosity: Verbosity,
    /// Optional deterministic base seed. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Naive,
            pool_size: 0,
            verbosity: Verbosity::QUIET,
            seed: None,
        }
    }
}

impl ReductionConfig {
    /// A default configuration for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Sets the requested pool size.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: i64) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the verbosity.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Pins the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Resolves the per-invocation context, drawing a seed if none is pinned.
    pub fn context(&self) -> RunContext {
        RunContext::new(self.seed.unwrap_or_else(rand::random), self.verbosity)
    }
}

/// Per-invocation state shared by every phase of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    seed: u64,
    verbosity: Verbosity,
}

impl RunContext {
    /// Stream offset for pool workers.
    pub(crate) const WORKER_STREAM: u64 = 0;
    /// Stream offset for DLF vertex tasks.
    pub(crate) const VERTEX_STREAM: u64 = 1 << 60;
    /// Stream for the forest unifier.
    pub(crate) const UNIFIER_STREAM: u64 = 1 << 61;

    /// A context with an explicit seed.
    pub const fn new(seed: u64, verbosity: Verbosity) -> Self {
        Self { seed, verbosity }
    }

    /// The run's base seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The run's verbosity.
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// An independently seeded generator for `stream`.
    ///
    /// Concurrent tasks each take their own stream; no generator is shared.
    pub fn rng(&self, stream: u64) -> SmallRng {
        SmallRng::seed_from_u64(splitmix64(self.seed ^ stream))
    }
}

/// SplitMix64 finalizer, used to decorrelate per-task seeds.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
