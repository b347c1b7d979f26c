//! `RoundBarrier`: a reusable barrier whose party count can shrink.
//!
//! `std::sync::Barrier` fixes its party count up front. Vertex tasks retire at
//! different rounds, so this barrier lets a party [`leave`](RoundBarrier::leave)
//! and releases the waiters if the departure completes the current round.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct State {
    parties: usize,
    arrived: usize,
    generation: u64,
}

impl State {
    fn release(&mut self) {
        self.arrived = 0;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// A generation-counting barrier over a shrinking set of parties.
#[derive(Debug)]
pub struct RoundBarrier {
    state: Mutex<State>,
    cvar: Condvar,
}

impl RoundBarrier {
    /// A barrier for `parties` participants.
    pub fn new(parties: usize) -> Self {
        Self {
            state: Mutex::new(State {
                parties,
                arrived: 0,
                generation: 0,
            }),
            cvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parties still taking part.
    pub fn parties(&self) -> usize {
        self.lock().parties
    }

    /// Blocks until every remaining party has arrived.
    ///
    /// Returns `true` for exactly one caller per generation (the last to
    /// arrive).
    pub fn wait(&self) -> bool {
        let mut state = self.lock();
        let generation = state.generation;
        state.arrived += 1;
        if state.arrived >= state.parties {
            state.release();
            self.cvar.notify_all();
            return true;
        }
        while state.generation == generation {
            state = self.cvar.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        false
    }

    /// Removes the caller from every future round.
    ///
    /// If the remaining parties have all arrived, the current round completes.
    pub fn leave(&self) {
        let mut state = self.lock();
        state.parties = state.parties.saturating_sub(1);
        if state.arrived > 0 && state.arrived >= state.parties {
            state.release();
            self.cvar.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn single_party_never_blocks() {
        let b = RoundBarrier::new(1);
        assert!(b.wait());
        assert!(b.wait());
    }

    #[test]
    fn leaving_releases_waiters() {
        let b = RoundBarrier::new(3);
        let passed = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| {
                    b.wait();
                    passed.fetch_add(1, Ordering::SeqCst);
                });
            }
            while b.lock().arrived < 2 {
                std::thread::yield_now();
            }
            b.leave();
        });
        assert_eq!(passed.load(Ordering::SeqCst), 2);
        assert_eq!(b.parties(), 2);
    }

    #[test]
    fn no_one_runs_ahead() {
        let b = RoundBarrier::new(4);
        let round = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for r in 0..10 {
                        assert!(round.load(Ordering::SeqCst) >= r * 4);
                        round.fetch_add(1, Ordering::SeqCst);
                        b.wait();
                    }
                });
            }
        });
        assert_eq!(round.load(Ordering::SeqCst), 40);
    }
}
