//! Lock helpers shared by `Station` and `Train`.
//!
//! Monitor state is plain flags and counters that are consistent whenever the
//! lock is released, so a poisoned lock is recovered rather than propagated.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[inline]
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Block on `cv` until `ready` holds.
#[inline]
pub(crate) fn wait_until<'a, T, F>(cv: &Condvar, guard: MutexGuard<'a, T>, mut ready: F) -> MutexGuard<'a, T>
where
    F: FnMut(&mut T) -> bool,
{
    cv.wait_while(guard, |s| !ready(s))
        .unwrap_or_else(PoisonError::into_inner)
}
