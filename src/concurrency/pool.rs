//! `RoundPool`: a fixed set of workers driven in lock-step rounds.
//!
//! Each worker owns a private control channel and shares one result channel
//! with its siblings. A round sends one message per worker and then drains
//! exactly one completion signal per message before returning, so no worker
//! sees round R+1 before every worker has reported round R.
//!
//! The pool lives on scoped threads: workers may borrow from the enclosing
//! scope (the run's graph), and dropping the pool closes the control channels
//! so the workers exit before the scope joins them. A pool must therefore be
//! dropped inside the scope that spawned it.

use std::ops::Range;
use std::thread::Scope;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::rngs::SmallRng;

use crate::config::RunContext;
use crate::error::ProtocolError;

/// What a worker reports on the shared result channel.
#[derive(Debug)]
pub enum Signal<R> {
    /// A payload produced while handling the current message.
    Item(R),
    /// The worker finished its slice of the round.
    Done {
        /// Reporting worker.
        worker: usize,
    },
    /// The worker hit a protocol violation; it still counts as finished.
    Failed(ProtocolError),
}

/// Per-worker handle passed to the message handler.
pub struct WorkerCtx<R> {
    id: usize,
    size: usize,
    rng: SmallRng,
    results: Sender<Signal<R>>,
}

impl<R> WorkerCtx<R> {
    /// This worker's id in `0..size`.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The worker's private generator.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Reports a payload to the leader. Returns `false` once the leader is gone.
    pub fn emit(&self, item: R) -> bool {
        self.results.send(Signal::Item(item)).is_ok()
    }
}

/// Worker count for a graph of `nodes` nodes.
///
/// `requested <= 0` selects `floor(sqrt(nodes))`; a positive request is capped
/// at that value. Never below 1.
pub fn pool_size(nodes: usize, requested: i64) -> usize {
    let cap = isqrt(nodes);
    let size = match usize::try_from(requested) {
        Ok(r) if r > 0 => r.min(cap),
        _ => cap,
    };
    size.max(1)
}

fn isqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Splits `0..len` into `parts` contiguous ranges; the last absorbs the
/// remainder.
pub fn split_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let chunk = len / parts;
    (0..parts)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == parts { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// A pool of scoped workers handling messages of type `M` and reporting
/// payloads of type `R`.
pub struct RoundPool<M, R> {
    controls: Vec<Sender<M>>,
    results: Receiver<Signal<R>>,
}

impl<M: Send, R: Send> RoundPool<M, R> {
    /// Spawns `size` workers on `scope`, each running a clone of `handler`.
    pub fn spawn<'scope, 'env, F>(
        scope: &'scope Scope<'scope, 'env>,
        size: usize,
        ctx: &RunContext,
        handler: F,
    ) -> Self
    where
        M: 'scope,
        R: 'scope,
        F: Fn(&mut WorkerCtx<R>, M) -> Result<(), ProtocolError> + Clone + Send + 'scope,
    {
        let size = size.max(1);
        let (result_tx, results) = unbounded();
        let mut controls = Vec::with_capacity(size);
        for id in 0..size {
            let (control_tx, control_rx) = unbounded::<M>();
            controls.push(control_tx);
            let handler = handler.clone();
            let mut worker = WorkerCtx {
                id,
                size,
                rng: ctx.rng(RunContext::WORKER_STREAM ^ id as u64),
                results: result_tx.clone(),
            };
            scope.spawn(move || {
                while let Ok(message) = control_rx.recv() {
                    let signal = match handler(&mut worker, message) {
                        Ok(()) => Signal::Done { worker: id },
                        Err(err) => Signal::Failed(err),
                    };
                    if worker.results.send(signal).is_err() {
                        break;
                    }
                }
                tracing::trace!(worker = id, "worker exiting");
            });
        }
        Self { controls, results }
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.controls.len()
    }

    /// Runs one round: message `i` goes to worker `i`, every payload is
    /// handed to `on_item`, and the call returns once each addressed worker
    /// has reported. The first failure is returned after the barrier.
    pub fn round<I>(&self, messages: I, mut on_item: impl FnMut(R)) -> Result<(), ProtocolError>
    where
        I: IntoIterator<Item = M>,
    {
        let mut pending = 0;
        for (worker, (control, message)) in self.controls.iter().zip(messages).enumerate() {
            control
                .send(message)
                .map_err(|_| ProtocolError::WorkerLost { worker })?;
            pending += 1;
        }

        let mut first_error = None;
        while pending > 0 {
            match self.results.recv() {
                Ok(Signal::Item(item)) => on_item(item),
                Ok(Signal::Done { .. }) => pending -= 1,
                Ok(Signal::Failed(err)) => {
                    pending -= 1;
                    first_error.get_or_insert(err);
                }
                Err(_) => {
                    return Err(ProtocolError::WorkerLost {
                        worker: self.size() - pending,
                    })
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
