//! Plain data row types written by output backends.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    TicketSold,
    TicketValid,
    Fined,
    Arrived,
    Stuck,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::TicketSold  => "ticket_sold",
            EventKind::TicketValid => "ticket_valid",
            EventKind::Fined       => "fined",
            EventKind::Arrived     => "arrived",
            EventKind::Stuck       => "stuck",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    /// Order in which the journal received the event.
    pub seq:     u64,
    pub kind:    EventKind,
    /// Passenger id.
    pub actor:   u32,
    pub station: Option<u32>,
    pub train:   Option<u32>,
    /// Ticket price or fine; `None` for events that move no money.
    pub amount:  Option<i64>,
    /// Passenger balance after the event.
    pub balance: Option<i64>,
}
