//! Parked waiting for the two-phase API.
//!
//! The queue blocks by busy-polling; that is the right default for
//! latency-critical traffic but burns a core while idle. Callers moving
//! low-frequency data can pair `try_push`/`try_pop` with a `Waiter`:
//! park on `NotReady`, have the opposite side `notify` after it makes
//! progress. The queue's ordering and visibility contract is unchanged;
//! the waiter only bounds how long a parked thread sleeps between polls.

use std::time::Duration;

use parking_lot::{ Condvar, Mutex };

/// Condition-variable backed parking primitive.
///
/// Wakeups are advisory: a `wait` may return spuriously or on timeout, so
/// callers must always re-poll with `try_push`/`try_pop` before acting.
pub struct Waiter {
    mutex: Mutex<()>,
    condition: Condvar,
    spin_tries: usize,
}

impl Waiter {
    /// Create a waiter with the default short spin phase
    pub fn new() -> Self {
        Self {
            mutex: Mutex::new(()),
            condition: Condvar::new(),
            spin_tries: 100,
        }
    }

    /// Create a waiter with a custom spin phase length
    pub fn with_spin_tries(spin_tries: usize) -> Self {
        Self {
            mutex: Mutex::new(()),
            condition: Condvar::new(),
            spin_tries,
        }
    }

    /// Wait for a notification, for at most `max_park`.
    ///
    /// Spins briefly first so that traffic arriving within a few hundred
    /// nanoseconds never pays the parking cost.
    pub fn wait(&self, max_park: Duration) {
        for _ in 0..self.spin_tries {
            std::hint::spin_loop();
        }

        let mut guard = self.mutex.lock();
        let _ = self.condition.wait_for(&mut guard, max_park);
    }

    /// Wake every parked thread
    pub fn notify(&self) {
        self.condition.notify_all();
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::new()
    }
}
