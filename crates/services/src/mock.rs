//! Recording mocks for the messaging and banking services
//!
//! Both mocks keep every call they receive. Tests register what they expect
//! with `expect*` and then call `verify`, which compares expected and actual
//! calls ignoring order and clears both lists for the next step.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use auctionhouse_core::{LotNumber, Money, Status, StatusKind};
use serde::Serialize;
use uuid::Uuid;

use crate::banking::BankingService;
use crate::error::VerificationError;
use crate::messaging::{Event, MessagingService, Notification};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Compare two call lists as multisets, draining both
fn drain_and_compare<T: Ord + ToString>(
    expected: &mut Vec<T>,
    actual: &mut Vec<T>,
) -> Result<(), (Vec<String>, Vec<String>)> {
    let mut expected = std::mem::take(expected);
    let mut actual = std::mem::take(actual);
    expected.sort();
    actual.sort();

    if expected == actual {
        Ok(())
    } else {
        Err((
            expected.iter().map(ToString::to_string).collect(),
            actual.iter().map(ToString::to_string).collect(),
        ))
    }
}

/// Mock messaging service
///
/// Records notifications instead of delivering them.
#[derive(Debug, Default)]
pub struct MockMessagingService {
    sent: Mutex<Vec<Notification>>,
    expected: Mutex<Vec<Notification>>,
}

impl MockMessagingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `event` to have been sent to `address`
    pub fn expect(&self, address: impl Into<String>, event: Event) {
        lock(&self.expected).push(Notification::new(address, event));
    }

    pub fn expect_auction_opened(&self, address: impl Into<String>, lot: LotNumber) {
        self.expect(address, Event::AuctionOpened { lot });
    }

    pub fn expect_bid_accepted(&self, address: impl Into<String>, lot: LotNumber, amount: Money) {
        self.expect(address, Event::BidAccepted { lot, amount });
    }

    pub fn expect_lot_sold(&self, address: impl Into<String>, lot: LotNumber) {
        self.expect(address, Event::LotSold { lot });
    }

    pub fn expect_lot_unsold(&self, address: impl Into<String>, lot: LotNumber) {
        self.expect(address, Event::LotUnsold { lot });
    }

    /// Check the notifications sent since the last `verify` against the expected ones.
    ///
    /// Both lists are cleared whether or not they matched.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let mut expected = lock(&self.expected);
        let mut sent = lock(&self.sent);
        drain_and_compare(&mut *expected, &mut *sent)
            .map_err(|(expected, actual)| VerificationError::Notifications { expected, actual })
    }

    /// Forget everything sent and expected so far
    pub fn reset(&self) {
        lock(&self.expected).clear();
        lock(&self.sent).clear();
    }

    /// Notifications sent since the last `verify`, in send order
    pub fn sent(&self) -> Vec<Notification> {
        lock(&self.sent).clone()
    }

    /// Events sent to one address since the last `verify`
    pub fn sent_to(&self, address: &str) -> Vec<Event> {
        lock(&self.sent)
            .iter()
            .filter(|n| n.address == address)
            .map(|n| n.event.clone())
            .collect()
    }
}

impl MessagingService for MockMessagingService {
    fn notify(&self, address: &str, event: &Event) {
        tracing::debug!(address, lot = event.lot(), %event, "Notification recorded");
        lock(&self.sent).push(Notification::new(address, event.clone()));
    }
}

/// Parameters of one transfer, as requested by the caller
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TransferRequest {
    pub from_account: String,
    pub auth_code: String,
    pub to_account: String,
    pub amount: Money,
}

impl TransferRequest {
    pub fn new(
        from_account: impl Into<String>,
        auth_code: impl Into<String>,
        to_account: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            from_account: from_account.into(),
            auth_code: auth_code.into(),
            to_account: to_account.into(),
            amount,
        }
    }
}

impl std::fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) -> {}: {}",
            self.from_account, self.auth_code, self.to_account, self.amount
        )
    }
}

/// A transfer the mock bank was asked to make
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub reference: Uuid,
    pub request: TransferRequest,
    pub succeeded: bool,
}

/// Mock banking service
///
/// Every transfer succeeds unless it debits or credits an account marked
/// with `fail_account`.
#[derive(Debug, Default)]
pub struct MockBankingService {
    transfers: Mutex<Vec<TransferRecord>>,
    expected: Mutex<Vec<TransferRequest>>,
    failing_accounts: Mutex<HashSet<String>>,
}

impl MockBankingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every transfer touching `account` fail
    pub fn fail_account(&self, account: impl Into<String>) {
        lock(&self.failing_accounts).insert(account.into());
    }

    /// Let transfers touching `account` succeed again
    pub fn restore_account(&self, account: &str) {
        lock(&self.failing_accounts).remove(account);
    }

    pub fn expect_transfer(
        &self,
        from_account: impl Into<String>,
        auth_code: impl Into<String>,
        to_account: impl Into<String>,
        amount: Money,
    ) {
        lock(&self.expected).push(TransferRequest::new(
            from_account,
            auth_code,
            to_account,
            amount,
        ));
    }

    /// Check the transfers attempted since the last `verify` against the expected ones.
    ///
    /// Failed attempts count. Both lists are cleared whether or not they matched.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let mut expected = lock(&self.expected);
        let mut attempted: Vec<TransferRequest> = lock(&self.transfers)
            .drain(..)
            .map(|record| record.request)
            .collect();
        drain_and_compare(&mut *expected, &mut attempted)
            .map_err(|(expected, actual)| VerificationError::Transfers { expected, actual })
    }

    /// Forget every recorded and expected transfer. Failing accounts stay failing.
    pub fn reset(&self) {
        lock(&self.expected).clear();
        lock(&self.transfers).clear();
    }

    /// Transfers attempted since the last `verify`, in call order
    pub fn transfers(&self) -> Vec<TransferRecord> {
        lock(&self.transfers).clone()
    }
}

impl BankingService for MockBankingService {
    fn transfer(
        &self,
        from_account: &str,
        auth_code: &str,
        to_account: &str,
        amount: Money,
    ) -> Status {
        let declined = {
            let failing = lock(&self.failing_accounts);
            failing.contains(from_account) || failing.contains(to_account)
        };
        let reference = Uuid::new_v4();

        lock(&self.transfers).push(TransferRecord {
            reference,
            request: TransferRequest::new(from_account, auth_code, to_account, amount),
            succeeded: !declined,
        });

        if declined {
            tracing::debug!(from_account, to_account, %amount, "Transfer declined");
            Status::error(format!(
                "Transfer of {} from {} to {} declined",
                amount, from_account, to_account
            ))
        } else {
            tracing::debug!(from_account, to_account, %amount, %reference, "Transfer recorded");
            Status::new(StatusKind::Ok, reference.to_string())
        }
    }
}
