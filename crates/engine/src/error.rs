//! Auction house errors

use std::path::PathBuf;

use auctionhouse_core::{LotNumber, Money};
use thiserror::Error;

use crate::lot::LotStatus;

/// Reasons an auction house request is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuctionError {
    /// A required text argument was empty
    #[error("{field} given to {operation} cannot be empty")]
    EmptyField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Buyer already registered: {0}")]
    BuyerAlreadyRegistered(String),

    #[error("Seller already registered: {0}")]
    SellerAlreadyRegistered(String),

    #[error("Buyer not registered: {0}")]
    UnknownBuyer(String),

    #[error("Seller not registered: {0}")]
    UnknownSeller(String),

    #[error("Lot {0} does not exist")]
    UnknownLot(LotNumber),

    #[error("Lot {0} already exists")]
    LotAlreadyExists(LotNumber),

    #[error("Reserve price must be positive, got {0}")]
    InvalidReservePrice(Money),

    #[error("Bid must be positive, got {0}")]
    InvalidBid(Money),

    #[error("Buyer {buyer} already noted interest in lot {lot}")]
    AlreadyInterested { buyer: String, lot: LotNumber },

    #[error("Buyer {buyer} has not noted interest in lot {lot}")]
    NotInterested { buyer: String, lot: LotNumber },

    #[error("Bid of {bid} on lot {lot} is below the minimum of {minimum}")]
    BidTooLow {
        lot: LotNumber,
        bid: Money,
        minimum: Money,
    },

    /// The lot is not in the state the request needs
    #[error("Lot {lot} is {status}, expected {expected}")]
    InvalidLotStatus {
        lot: LotNumber,
        status: LotStatus,
        expected: LotStatus,
    },

    /// Money arithmetic on the lot would overflow
    #[error("Amount {amount} on lot {lot} is too large to settle")]
    AmountOutOfRange { lot: LotNumber, amount: Money },

    #[error("Lot {lot} is closed ({status})")]
    LotClosed { lot: LotNumber, status: LotStatus },

    #[error("Lot {lot} was opened by {opened_by}, not {auctioneer}")]
    WrongAuctioneer {
        lot: LotNumber,
        opened_by: String,
        auctioneer: String,
    },

    #[error("Lot {lot} cannot move from {from} to {to}")]
    InvalidTransition {
        lot: LotNumber,
        from: LotStatus,
        to: LotStatus,
    },
}

impl AuctionError {
    pub fn empty_field(operation: &'static str, field: &'static str) -> Self {
        AuctionError::EmptyField { operation, field }
    }
}

/// Result type for auction house operations
pub type AuctionResult<T> = Result<T, AuctionError>;

/// Errors loading or validating a `HouseConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
