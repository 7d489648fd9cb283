//! Passenger-owned state touched by the handshakes.
//!
//! The passenger thread owns its `Rider` exclusively and lends it to a
//! monitor call (`&mut Rider`) for the duration of one handshake.  The only
//! exception is the inspector's fine, which lands after `show_ticket` has
//! returned; the wallet is therefore an atomic behind an `Arc` the inspector
//! borrows for that one adjustment.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use mt_core::{PassengerId, Ticket};

/// A balance that may go negative.
#[derive(Debug, Default)]
pub struct Wallet(AtomicI64);

impl Wallet {
    pub fn new(balance: i64) -> Self {
        Self(AtomicI64::new(balance))
    }

    #[inline]
    pub fn balance(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    /// Add `delta` (negative to debit) and return the new balance.
    #[inline]
    pub fn adjust(&self, delta: i64) -> i64 {
        self.0.fetch_add(delta, Ordering::AcqRel) + delta
    }
}

/// The wallet and ticket of one passenger.
#[derive(Debug)]
pub struct Rider {
    id:     PassengerId,
    wallet: Arc<Wallet>,
    ticket: Ticket,
}

impl Rider {
    pub fn new(id: PassengerId, balance: i64) -> Self {
        Self {
            id,
            wallet: Arc::new(Wallet::new(balance)),
            ticket: Ticket::None,
        }
    }

    #[inline]
    pub fn id(&self) -> PassengerId {
        self.id
    }

    #[inline]
    pub fn balance(&self) -> i64 {
        self.wallet.balance()
    }

    /// Current ticket, without consuming it.
    #[inline]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Replace the ticket.  Used to hand a passenger a ticket bought
    /// elsewhere (or a forged one).
    pub fn set_ticket(&mut self, ticket: Ticket) {
        self.ticket = ticket;
    }

    pub(crate) fn take_ticket(&mut self) -> Ticket {
        self.ticket.take()
    }

    pub(crate) fn wallet(&self) -> &Arc<Wallet> {
        &self.wallet
    }
}
