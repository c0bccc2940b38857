//! Lot state machine

use auctionhouse_core::{LotNumber, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalogue::CatalogueEntry;
use crate::error::{AuctionError, AuctionResult};

/// Lot status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    /// Listed, bidding not started
    Unopened,
    /// Open for bids
    InAuction,
    /// Sold and paid for
    Sold,
    /// Closed below reserve
    Unsold,
    /// Sold, but a bank transfer failed
    SoldPendingPayment,
}

impl LotStatus {
    /// Terminal states; a closed lot never reopens
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            LotStatus::Sold | LotStatus::Unsold | LotStatus::SoldPendingPayment
        )
    }
}

/// An accepted bid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bid {
    pub buyer: String,
    pub amount: Money,
    pub placed_at: DateTime<Utc>,
}

/// An item for sale
#[derive(Debug, Clone, Serialize)]
pub struct Lot {
    number: LotNumber,
    seller: String,
    description: String,
    reserve_price: Money,
    status: LotStatus,
    /// Set when the lot is opened
    auctioneer: Option<String>,
    /// Buyers in the order they noted interest
    interested_buyers: Vec<String>,
    /// Accepted bids, oldest first; the last one is the highest
    bids: Vec<Bid>,
}

impl Lot {
    pub fn new(
        number: LotNumber,
        seller: impl Into<String>,
        description: impl Into<String>,
        reserve_price: Money,
    ) -> Self {
        Self {
            number,
            seller: seller.into(),
            description: description.into(),
            reserve_price,
            status: LotStatus::Unopened,
            auctioneer: None,
            interested_buyers: Vec::new(),
            bids: Vec::new(),
        }
    }

    pub fn number(&self) -> LotNumber {
        self.number
    }

    /// Name of the seller who listed the lot
    pub fn seller(&self) -> &str {
        &self.seller
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reserve_price(&self) -> Money {
        self.reserve_price
    }

    pub fn status(&self) -> LotStatus {
        self.status
    }

    /// Auctioneer who opened the lot
    pub fn auctioneer(&self) -> Option<&str> {
        self.auctioneer.as_deref()
    }

    pub fn interested_buyers(&self) -> &[String] {
        &self.interested_buyers
    }

    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    pub fn highest_bid(&self) -> Option<&Bid> {
        self.bids.last()
    }

    pub fn highest_bidder(&self) -> Option<&str> {
        self.highest_bid().map(|bid| bid.buyer.as_str())
    }

    /// Current highest bid amount, which becomes the hammer price on close
    pub fn hammer_price(&self) -> Option<Money> {
        self.highest_bid().map(|bid| bid.amount)
    }

    pub fn is_interested(&self, buyer: &str) -> bool {
        self.interested_buyers.iter().any(|name| name == buyer)
    }

    /// Lowest bid the lot will currently accept, or `None` if the highest
    /// bid is already too large to raise by `increment`
    pub fn minimum_next_bid(&self, increment: Money) -> Option<Money> {
        self.hammer_price()
            .unwrap_or(Money::ZERO)
            .checked_add(&increment)
    }

    /// Whether the highest bid reaches the reserve price
    pub fn meets_reserve(&self) -> bool {
        self.winning_bid().is_some()
    }

    /// Highest bid, if it reaches the reserve price
    pub fn winning_bid(&self) -> Option<&Bid> {
        self.highest_bid()
            .filter(|bid| bid.amount >= self.reserve_price)
    }

    pub fn catalogue_entry(&self) -> CatalogueEntry {
        CatalogueEntry::new(self.number, self.description.clone(), self.status)
    }

    /// Register a buyer's interest; only interested buyers may bid
    pub fn note_interest(&mut self, buyer: &str) -> AuctionResult<()> {
        if self.status.is_closed() {
            return Err(AuctionError::LotClosed {
                lot: self.number,
                status: self.status,
            });
        }
        if self.is_interested(buyer) {
            return Err(AuctionError::AlreadyInterested {
                buyer: buyer.to_string(),
                lot: self.number,
            });
        }

        self.interested_buyers.push(buyer.to_string());
        Ok(())
    }

    /// Start bidding, recording who runs the auction
    pub fn open(&mut self, auctioneer: &str) -> AuctionResult<()> {
        self.expect_status(LotStatus::Unopened)?;

        self.auctioneer = Some(auctioneer.to_string());
        self.status = LotStatus::InAuction;
        Ok(())
    }

    /// Accept a bid that beats the current highest by at least `increment`
    pub fn place_bid(&mut self, buyer: &str, amount: Money, increment: Money) -> AuctionResult<()> {
        self.expect_status(LotStatus::InAuction)?;

        if !self.is_interested(buyer) {
            return Err(AuctionError::NotInterested {
                buyer: buyer.to_string(),
                lot: self.number,
            });
        }
        if !amount.is_positive() {
            return Err(AuctionError::InvalidBid(amount));
        }

        let minimum = self
            .minimum_next_bid(increment)
            .ok_or(AuctionError::AmountOutOfRange {
                lot: self.number,
                amount,
            })?;
        if amount < minimum {
            return Err(AuctionError::BidTooLow {
                lot: self.number,
                bid: amount,
                minimum,
            });
        }

        self.bids.push(Bid {
            buyer: buyer.to_string(),
            amount,
            placed_at: Utc::now(),
        });
        Ok(())
    }

    /// Check that `auctioneer` may close the lot right now.
    ///
    /// The lot's status is checked before the auctioneer's identity, so closing
    /// an unopened or closed lot reports the status even for a stranger.
    pub fn ensure_closable_by(&self, auctioneer: &str) -> AuctionResult<()> {
        self.expect_status(LotStatus::InAuction)?;

        match self.auctioneer() {
            Some(opened_by) if opened_by == auctioneer => Ok(()),
            opened_by => Err(AuctionError::WrongAuctioneer {
                lot: self.number,
                opened_by: opened_by.unwrap_or_default().to_string(),
                auctioneer: auctioneer.to_string(),
            }),
        }
    }

    /// Move an open lot into one of the closed states
    pub fn close_as(&mut self, outcome: LotStatus) -> AuctionResult<()> {
        if self.status != LotStatus::InAuction || !outcome.is_closed() {
            return Err(AuctionError::InvalidTransition {
                lot: self.number,
                from: self.status,
                to: outcome,
            });
        }

        self.status = outcome;
        Ok(())
    }

    fn expect_status(&self, expected: LotStatus) -> AuctionResult<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(AuctionError::InvalidLotStatus {
                lot: self.number,
                status: self.status,
                expected,
            })
        }
    }
}
