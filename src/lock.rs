use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::{Id, error::Error};

/// Per-fixture readers-writer lock with a bounded wait.
///
/// Standings and pairing generation take the lock shared; recording and
/// resets take it exclusive, so a pairing never reads half-written
/// history. Fixtures are independent units of concurrency, so each gets
/// its own lock. Acquisition gives up with `Error::LockTimeout` instead
/// of blocking forever.
#[derive(Debug)]
pub struct FixtureLocks {
    timeout: Duration,
    locks: Mutex<HashMap<Id, Arc<RoundLock>>>,
}

#[derive(Debug, Default)]
struct RoundLock {
    state: Mutex<LockState>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct LockState {
    readers: usize,
    writer: bool,
}

impl FixtureLocks {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, fixture: Id) -> Arc<RoundLock> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(fixture).or_default().clone()
    }

    /// # Errors
    ///
    /// `Error::LockTimeout` if a writer holds the lock past the deadline.
    pub fn shared(&self, fixture: Id) -> Result<SharedGuard, Error> {
        let lock = self.lock_for(fixture);
        let deadline = Instant::now() + self.timeout;

        let mut state = lock.guard();
        while state.writer {
            state = lock.wait(state, deadline, fixture, "shared")?;
        }
        state.readers += 1;
        drop(state);

        Ok(SharedGuard { lock })
    }

    /// # Errors
    ///
    /// `Error::LockTimeout` if readers or a writer hold the lock past the
    /// deadline.
    pub fn exclusive(&self, fixture: Id) -> Result<ExclusiveGuard, Error> {
        let lock = self.lock_for(fixture);
        let deadline = Instant::now() + self.timeout;

        let mut state = lock.guard();
        while state.writer || state.readers > 0 {
            state = lock.wait(state, deadline, fixture, "exclusive")?;
        }
        state.writer = true;
        drop(state);

        Ok(ExclusiveGuard { lock })
    }
}

impl RoundLock {
    fn guard(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(
        &'a self,
        state: MutexGuard<'a, LockState>,
        deadline: Instant,
        fixture: Id,
        mode: &'static str,
    ) -> Result<MutexGuard<'a, LockState>, Error> {
        let now = Instant::now();
        if now >= deadline {
            return Err(Error::LockTimeout { fixture, mode });
        }

        let (state, result) = self
            .released
            .wait_timeout(state, deadline - now)
            .unwrap_or_else(PoisonError::into_inner);

        if result.timed_out() && (state.writer || (mode == "exclusive" && state.readers > 0)) {
            return Err(Error::LockTimeout { fixture, mode });
        }

        Ok(state)
    }
}

/// Held while reading a fixture. Released on drop.
#[derive(Debug)]
pub struct SharedGuard {
    lock: Arc<RoundLock>,
}

impl Drop for SharedGuard {
    fn drop(&mut self) {
        let mut state = self.lock.guard();
        state.readers = state.readers.saturating_sub(1);
        drop(state);
        self.lock.released.notify_all();
    }
}

/// Held while mutating a fixture. Released on drop.
#[derive(Debug)]
pub struct ExclusiveGuard {
    lock: Arc<RoundLock>,
}

impl Drop for ExclusiveGuard {
    fn drop(&mut self) {
        let mut state = self.lock.guard();
        state.writer = false;
        drop(state);
        self.lock.released.notify_all();
    }
}
