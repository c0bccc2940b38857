//! Auction House Core - Domain types
//!
//! This crate contains the fundamental types shared by the auction house crates:
//! - `Money`: Decimal amount normalised to the nearest pence
//! - `Status`: Uniform outcome value (kind + message) returned to callers

pub mod money;
pub mod status;

pub use money::{Money, MoneyError};
pub use status::{Status, StatusKind};

/// Unique number identifying a lot in the catalogue
pub type LotNumber = u32;
