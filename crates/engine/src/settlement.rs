//! Settlement - collecting from the buyer and paying the seller
//!
//! ```text
//! buyer ──(hammer + premium%)──▶ house ──(hammer − commission%)──▶ seller
//! ```
//!
//! The seller is only paid once the buyer's payment has gone through.

use std::fmt;

use auctionhouse_core::{LotNumber, Money, Status};
use auctionhouse_services::BankingService;
use serde::Serialize;

use crate::config::HouseConfig;
use crate::error::{AuctionError, AuctionResult};
use crate::party::{Buyer, Seller};

/// Amounts owed on a sold lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub lot: LotNumber,
    pub hammer_price: Money,
    /// Charged to the buyer: hammer price plus buyer premium
    pub buyer_charge: Money,
    /// Paid to the seller: hammer price less commission
    pub seller_payout: Money,
    /// What the house keeps
    pub house_margin: Money,
}

/// Which leg of a settlement failed, with the bank's status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PaymentFailure {
    Buyer(Status),
    Seller(Status),
}

impl fmt::Display for PaymentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFailure::Buyer(status) => write!(f, "buyer payment failed ({})", status),
            PaymentFailure::Seller(status) => write!(f, "seller payout failed ({})", status),
        }
    }
}

impl Settlement {
    /// Work out the amounts owed on `lot` sold at `hammer_price`.
    ///
    /// Fails if the charges cannot be represented.
    pub fn new(lot: LotNumber, hammer_price: Money, config: &HouseConfig) -> AuctionResult<Self> {
        let out_of_range = || AuctionError::AmountOutOfRange {
            lot,
            amount: hammer_price,
        };

        let buyer_charge = hammer_price
            .checked_add_percent(config.buyer_premium)
            .ok_or_else(out_of_range)?;
        let seller_payout = hammer_price
            .checked_sub_percent(config.commission)
            .ok_or_else(out_of_range)?;
        let house_margin = buyer_charge
            .checked_sub(&seller_payout)
            .ok_or_else(out_of_range)?;

        Ok(Self {
            lot,
            hammer_price,
            buyer_charge,
            seller_payout,
            house_margin,
        })
    }

    /// Make both transfers through `bank`
    pub fn execute(
        &self,
        bank: &dyn BankingService,
        buyer: &Buyer,
        seller: &Seller,
        config: &HouseConfig,
    ) -> Result<(), PaymentFailure> {
        let status = bank.transfer(
            &buyer.bank_account,
            &buyer.auth_code,
            &config.house_bank_account,
            self.buyer_charge,
        );
        if !status.is_ok() {
            return Err(PaymentFailure::Buyer(status));
        }

        let status = bank.transfer(
            &config.house_bank_account,
            &config.house_auth_code,
            &seller.bank_account,
            self.seller_payout,
        );
        if !status.is_ok() {
            return Err(PaymentFailure::Seller(status));
        }

        Ok(())
    }
}
