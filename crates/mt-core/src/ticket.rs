//! Track symbols and the single-use tickets stamped with them.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Identifier shared by a track, its stations, and tickets valid on it.
///
/// On the map a track is drawn with its symbol character; the symbol must be
/// a printable, non-blank character so it can never collide with walkable
/// ground (`' '`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSymbol(char);

impl TrackSymbol {
    /// Validate and wrap a map character.
    pub fn new(symbol: char) -> CoreResult<Self> {
        if symbol.is_whitespace() || symbol.is_control() {
            return Err(CoreError::InvalidSymbol(symbol));
        }
        Ok(Self(symbol))
    }

    #[inline]
    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for TrackSymbol {
    type Error = CoreError;
    fn try_from(c: char) -> CoreResult<Self> {
        TrackSymbol::new(c)
    }
}

impl fmt::Display for TrackSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A passenger's ticket: either nothing, or a stamp for one track.
///
/// Tickets are consumed on presentation to an inspector whatever the
/// verdict; [`take`](Self::take) leaves `Ticket::None` behind.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ticket {
    #[default]
    None,
    Stamped(TrackSymbol),
}

impl Ticket {
    /// Consume the ticket, resetting `self` to `Ticket::None`.
    #[inline]
    pub fn take(&mut self) -> Ticket {
        std::mem::take(self)
    }

    /// A ticket is valid for a train iff its stamp equals the train's track symbol.
    #[inline]
    pub fn is_valid_for(self, track: TrackSymbol) -> bool {
        matches!(self, Ticket::Stamped(s) if s == track)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ticket::None       => f.write_str("none"),
            Ticket::Stamped(s) => write!(f, "track {s}"),
        }
    }
}
