//! Auction House Engine
//!
//! In-memory auction house: sellers list lots, buyers note interest and bid,
//! auctioneers open and close bidding, and on a sale the house collects the
//! hammer price plus premium from the buyer and pays the seller less
//! commission.
//!
//! ```text
//! UNOPENED ──open──▶ IN_AUCTION ──close──┬──▶ UNSOLD                (reserve not met)
//!                                        ├──▶ SOLD                  (both transfers OK)
//!                                        └──▶ SOLD_PENDING_PAYMENT  (a transfer failed)
//! ```

mod catalogue;
mod config;
mod error;
mod house;
mod lot;
mod party;
mod settlement;
mod status;

pub use catalogue::CatalogueEntry;
pub use config::HouseConfig;
pub use error::{AuctionError, AuctionResult, ConfigError};
pub use house::{AuctionHouse, CloseOutcome};
pub use lot::{Bid, Lot, LotStatus};
pub use party::{Auctioneer, Buyer, Seller};
pub use settlement::{PaymentFailure, Settlement};
pub use status::IntoStatus;
