//! Auction House Services
//!
//! The auction house talks to two external collaborators, both synchronous:
//! - `MessagingService`: delivers auction events to a party's messaging address
//! - `BankingService`: moves money between bank accounts
//!
//! `MockMessagingService` and `MockBankingService` record every call so tests
//! (and the CLI) can inspect and verify what the house asked for.

mod banking;
mod error;
mod messaging;
mod mock;

pub use banking::BankingService;
pub use error::VerificationError;
pub use messaging::{Event, MessagingService, Notification};
pub use mock::{MockBankingService, MockMessagingService, TransferRecord, TransferRequest};
