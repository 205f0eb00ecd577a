//! # Phase Barrier
//!
//! Reusable rendezvous for a fixed number of participants.
//!
//! ```text
//!   worker 0 ──arrive──┐
//!   worker 1 ──arrive──┼──► last arrival bumps the generation,
//!   worker 2 ──arrive──┘    is ELECTED, and wakes everyone
//! ```
//!
//! Waiters sleep until the generation moves on, so spurious condvar wakeups
//! are harmless and the barrier is immediately reusable for the next phase.
//!
//! A barrier can be *broken*. Every pending and future arrival then fails
//! with [`EngineError::BarrierBroken`] instead of blocking forever. Workers
//! break the barrier when they unwind, so one panicking worker cannot
//! deadlock the rest.

use parking_lot::{Condvar, Mutex};

use crate::error::{EngineError, EngineResult};

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    broken: bool,
}

/// Outcome of a successful [`PhaseBarrier::arrive_and_wait`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseRelease {
    elected: bool,
    generation: u64,
}

impl PhaseRelease {
    /// True for exactly one participant per release.
    #[inline]
    #[must_use]
    pub const fn is_elected(&self) -> bool {
        self.elected
    }

    /// Sequence number of the release (0 for the first rendezvous).
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cyclic barrier for exactly `participants` threads.
#[derive(Debug)]
pub struct PhaseBarrier {
    participants: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
}

impl PhaseBarrier {
    /// Creates a barrier for `participants` threads.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParticipants`] if `participants` is zero.
    pub fn new(participants: usize) -> EngineResult<Self> {
        if participants == 0 {
            return Err(EngineError::InvalidParticipants);
        }
        Ok(Self {
            participants,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            released: Condvar::new(),
        })
    }

    /// Number of threads that must arrive per release.
    #[inline]
    #[must_use]
    pub const fn participants(&self) -> usize {
        self.participants
    }

    /// Blocks until all participants have arrived.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BarrierBroken`] if the barrier is or becomes
    /// broken before this rendezvous completes.
    pub fn arrive_and_wait(&self) -> EngineResult<PhaseRelease> {
        let mut state = self.state.lock();
        if state.broken {
            return Err(EngineError::BarrierBroken);
        }

        let generation = state.generation;
        state.arrived += 1;

        if state.arrived == self.participants {
            state.arrived = 0;
            state.generation = generation.wrapping_add(1);
            self.released.notify_all();
            return Ok(PhaseRelease {
                elected: true,
                generation,
            });
        }

        while state.generation == generation && !state.broken {
            self.released.wait(&mut state);
        }

        if state.generation == generation {
            return Err(EngineError::BarrierBroken);
        }
        Ok(PhaseRelease {
            elected: false,
            generation,
        })
    }

    /// Marks the barrier broken and wakes every waiter.
    pub fn break_barrier(&self) {
        let mut state = self.state.lock();
        if !state.broken {
            state.broken = true;
            tracing::warn!(
                arrived = state.arrived,
                participants = self.participants,
                "phase barrier broken"
            );
        }
        self.released.notify_all();
    }

    /// True once [`break_barrier`](Self::break_barrier) has been called.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_participants_rejected() {
        assert_eq!(PhaseBarrier::new(0).unwrap_err(), EngineError::InvalidParticipants);
    }

    #[test]
    fn test_single_participant_never_blocks() {
        let barrier = PhaseBarrier::new(1).unwrap();
        for expected in 0..5 {
            let release = barrier.arrive_and_wait().unwrap();
            assert!(release.is_elected());
            assert_eq!(release.generation(), expected);
        }
    }

    #[test]
    fn test_exactly_one_elected_per_release() {
        const THREADS: usize = 6;
        const ROUNDS: usize = 200;

        let barrier = PhaseBarrier::new(THREADS).unwrap();
        let elected: Vec<AtomicUsize> = (0..ROUNDS).map(|_| AtomicUsize::new(0)).collect();

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for round in 0..ROUNDS {
                        let release = barrier.arrive_and_wait().unwrap();
                        assert_eq!(release.generation(), round as u64);
                        if release.is_elected() {
                            elected[round].fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert!(elected.iter().all(|e| e.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_nobody_passes_early() {
        const THREADS: usize = 4;
        let barrier = PhaseBarrier::new(THREADS).unwrap();
        let arrived = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for round in 1..=50 {
                        arrived.fetch_add(1, Ordering::SeqCst);
                        barrier.arrive_and_wait().unwrap();
                        assert!(arrived.load(Ordering::SeqCst) >= round * THREADS);
                        barrier.arrive_and_wait().unwrap();
                    }
                });
            }
        });
    }

    #[test]
    fn test_break_releases_waiters() {
        let barrier = PhaseBarrier::new(3).unwrap();

        thread::scope(|s| {
            let waiter = s.spawn(|| barrier.arrive_and_wait());
            thread::sleep(Duration::from_millis(20));
            barrier.break_barrier();
            assert_eq!(waiter.join().unwrap(), Err(EngineError::BarrierBroken));
        });

        assert!(barrier.is_broken());
        assert_eq!(barrier.arrive_and_wait(), Err(EngineError::BarrierBroken));
    }
}
