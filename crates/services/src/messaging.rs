//! Messaging service interface and the events it carries

use auctionhouse_core::{LotNumber, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event delivered to a party's messaging address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Bidding opened on a lot
    AuctionOpened { lot: LotNumber },
    /// A bid was accepted on a lot
    BidAccepted { lot: LotNumber, amount: Money },
    /// A lot was sold and paid for
    LotSold { lot: LotNumber },
    /// A lot closed without a sale
    LotUnsold { lot: LotNumber },
}

impl Event {
    /// Lot the event refers to
    pub fn lot(&self) -> LotNumber {
        match self {
            Event::AuctionOpened { lot }
            | Event::BidAccepted { lot, .. }
            | Event::LotSold { lot }
            | Event::LotUnsold { lot } => *lot,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::AuctionOpened { lot } => write!(f, "auction opened on lot {}", lot),
            Event::BidAccepted { lot, amount } => {
                write!(f, "bid of {} accepted on lot {}", amount, lot)
            }
            Event::LotSold { lot } => write!(f, "lot {} sold", lot),
            Event::LotUnsold { lot } => write!(f, "lot {} unsold", lot),
        }
    }
}

/// An event addressed to one messaging address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub address: String,
    pub event: Event,
}

impl Notification {
    pub fn new(address: impl Into<String>, event: Event) -> Self {
        Self {
            address: address.into(),
            event,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.address, self.event)
    }
}

/// Delivers auction events to buyers, sellers and auctioneers.
///
/// Delivery is fire-and-forget: the house does not wait for or inspect any
/// acknowledgement.
pub trait MessagingService: Send + Sync {
    fn notify(&self, address: &str, event: &Event);
}
