//! Banking service interface

use auctionhouse_core::{Money, Status};

/// Moves money between bank accounts.
///
/// `auth_code` authorises debiting `from_account`. The returned status is
/// `OK` when the transfer completed; anything else means no money moved.
pub trait BankingService: Send + Sync {
    fn transfer(&self, from_account: &str, auth_code: &str, to_account: &str, amount: Money)
        -> Status;
}
