//! Auction House CLI
//!
//! Replays a scripted auction (a scenario file) against an `AuctionHouse`
//! wired to the recording mock services, and reports what happened.

pub mod commands;
pub mod context;
pub mod scenario;

pub use context::HouseContext;
pub use scenario::{Scenario, Step};
