//! Cooperative cancellation flag shared by every actor of one simulation.
//!
//! Blocking monitor waits are unbounded; cancelling a run means setting this
//! token *and* closing every monitor so that blocked threads observe it.
//! Loops that never block on a monitor (walking, moving) poll
//! [`CancelToken::is_cancelled`] once per step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheaply cloneable, one-way cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.  Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
