//! Auction house - registration, bidding and settlement

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use auctionhouse_core::{LotNumber, Money, StatusKind};
use auctionhouse_services::{BankingService, Event, MessagingService};

use crate::catalogue::CatalogueEntry;
use crate::config::HouseConfig;
use crate::error::{AuctionError, AuctionResult};
use crate::lot::{Lot, LotStatus};
use crate::party::{Auctioneer, Buyer, Seller};
use crate::settlement::{PaymentFailure, Settlement};

/// How a closed auction ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Sold, buyer charged and seller paid
    Sale(Settlement),
    /// Reserve not reached
    NoSale { lot: LotNumber },
    /// Sold, but one of the transfers failed
    SalePendingPayment {
        settlement: Settlement,
        failure: PaymentFailure,
    },
}

impl CloseOutcome {
    pub fn kind(&self) -> StatusKind {
        match self {
            CloseOutcome::Sale(_) => StatusKind::Sale,
            CloseOutcome::NoSale { .. } => StatusKind::NoSale,
            CloseOutcome::SalePendingPayment { .. } => StatusKind::SalePendingPayment,
        }
    }
}

fn require(value: &str, operation: &'static str, field: &'static str) -> AuctionResult<()> {
    if value.is_empty() {
        Err(AuctionError::empty_field(operation, field))
    } else {
        Ok(())
    }
}

/// The auction house
///
/// Holds every buyer, seller, auctioneer and lot in memory. Each operation
/// validates its input, updates state, sends any notifications and returns.
/// Nothing is retried: a rejected request leaves the house unchanged.
pub struct AuctionHouse {
    config: HouseConfig,
    messaging: Arc<dyn MessagingService>,
    banking: Arc<dyn BankingService>,
    buyers: HashMap<String, Buyer>,
    sellers: HashMap<String, Seller>,
    auctioneers: HashMap<String, Auctioneer>,
    /// Keyed by lot number, so iteration is catalogue order
    lots: BTreeMap<LotNumber, Lot>,
}

impl AuctionHouse {
    /// Create an empty house. `config` is expected to be validated already.
    pub fn new(
        config: HouseConfig,
        messaging: Arc<dyn MessagingService>,
        banking: Arc<dyn BankingService>,
    ) -> Self {
        Self {
            config,
            messaging,
            banking,
            buyers: HashMap::new(),
            sellers: HashMap::new(),
            auctioneers: HashMap::new(),
            lots: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &HouseConfig {
        &self.config
    }

    pub fn buyer(&self, name: &str) -> Option<&Buyer> {
        self.buyers.get(name)
    }

    pub fn seller(&self, name: &str) -> Option<&Seller> {
        self.sellers.get(name)
    }

    pub fn auctioneer(&self, name: &str) -> Option<&Auctioneer> {
        self.auctioneers.get(name)
    }

    pub fn lot(&self, number: LotNumber) -> Option<&Lot> {
        self.lots.get(&number)
    }

    // === Registration ===

    pub fn register_buyer(
        &mut self,
        name: &str,
        address: &str,
        bank_account: &str,
        auth_code: &str,
    ) -> AuctionResult<()> {
        tracing::debug!(operation = "register_buyer", buyer = name, "Message in");
        self.insert_buyer(name, address, bank_account, auth_code)
            .inspect_err(|error| tracing::warn!(operation = "register_buyer", %error, "Rejected"))
    }

    fn insert_buyer(
        &mut self,
        name: &str,
        address: &str,
        bank_account: &str,
        auth_code: &str,
    ) -> AuctionResult<()> {
        const OP: &str = "register_buyer";
        require(name, OP, "Buyer name")?;
        require(address, OP, "Address")?;
        require(bank_account, OP, "Bank account")?;
        require(auth_code, OP, "Bank authorisation code")?;

        if self.buyers.contains_key(name) {
            return Err(AuctionError::BuyerAlreadyRegistered(name.to_string()));
        }

        self.buyers.insert(
            name.to_string(),
            Buyer::new(name, address, bank_account, auth_code),
        );
        Ok(())
    }

    pub fn register_seller(
        &mut self,
        name: &str,
        address: &str,
        bank_account: &str,
    ) -> AuctionResult<()> {
        tracing::debug!(operation = "register_seller", seller = name, "Message in");
        self.insert_seller(name, address, bank_account)
            .inspect_err(|error| tracing::warn!(operation = "register_seller", %error, "Rejected"))
    }

    fn insert_seller(&mut self, name: &str, address: &str, bank_account: &str) -> AuctionResult<()> {
        const OP: &str = "register_seller";
        require(name, OP, "Seller name")?;
        require(address, OP, "Address")?;
        require(bank_account, OP, "Bank account")?;

        if self.sellers.contains_key(name) {
            return Err(AuctionError::SellerAlreadyRegistered(name.to_string()));
        }

        self.sellers
            .insert(name.to_string(), Seller::new(name, address, bank_account));
        Ok(())
    }

    // === Lots ===

    pub fn add_lot(
        &mut self,
        seller: &str,
        number: LotNumber,
        description: &str,
        reserve_price: Money,
    ) -> AuctionResult<()> {
        tracing::debug!(operation = "add_lot", seller, lot = number, "Message in");
        self.insert_lot(seller, number, description, reserve_price)
            .inspect_err(|error| tracing::warn!(operation = "add_lot", %error, "Rejected"))
    }

    fn insert_lot(
        &mut self,
        seller: &str,
        number: LotNumber,
        description: &str,
        reserve_price: Money,
    ) -> AuctionResult<()> {
        const OP: &str = "add_lot";
        require(seller, OP, "Seller name")?;
        if !self.sellers.contains_key(seller) {
            return Err(AuctionError::UnknownSeller(seller.to_string()));
        }
        if self.lots.contains_key(&number) {
            return Err(AuctionError::LotAlreadyExists(number));
        }
        require(description, OP, "Lot description")?;
        if !reserve_price.is_positive() {
            return Err(AuctionError::InvalidReservePrice(reserve_price));
        }

        self.lots
            .insert(number, Lot::new(number, seller, description, reserve_price));
        Ok(())
    }

    /// Catalogue entries in ascending lot number
    pub fn view_catalogue(&self) -> Vec<CatalogueEntry> {
        tracing::debug!(operation = "view_catalogue", lots = self.lots.len(), "Message in");
        self.lots.values().map(Lot::catalogue_entry).collect()
    }

    pub fn note_interest(&mut self, buyer: &str, number: LotNumber) -> AuctionResult<()> {
        tracing::debug!(operation = "note_interest", buyer, lot = number, "Message in");
        self.record_interest(buyer, number)
            .inspect_err(|error| tracing::warn!(operation = "note_interest", %error, "Rejected"))
    }

    fn record_interest(&mut self, buyer: &str, number: LotNumber) -> AuctionResult<()> {
        require(buyer, "note_interest", "Buyer name")?;
        if !self.buyers.contains_key(buyer) {
            return Err(AuctionError::UnknownBuyer(buyer.to_string()));
        }

        self.lot_mut(number)?.note_interest(buyer)
    }

    // === Auctions ===

    /// Open bidding on a lot. The auctioneer is registered on first use.
    pub fn open_auction(
        &mut self,
        auctioneer: &str,
        address: &str,
        number: LotNumber,
    ) -> AuctionResult<()> {
        tracing::debug!(operation = "open_auction", auctioneer, lot = number, "Message in");
        self.start_auction(auctioneer, address, number)
            .inspect_err(|error| tracing::warn!(operation = "open_auction", %error, "Rejected"))
    }

    fn start_auction(
        &mut self,
        auctioneer: &str,
        address: &str,
        number: LotNumber,
    ) -> AuctionResult<()> {
        const OP: &str = "open_auction";
        require(auctioneer, OP, "Auctioneer name")?;
        require(address, OP, "Auctioneer address")?;

        self.lot_mut(number)?.open(auctioneer)?;
        self.auctioneers
            .entry(auctioneer.to_string())
            .or_insert_with(|| Auctioneer::new(auctioneer, address));

        let lot = &self.lots[&number];
        let event = Event::AuctionOpened { lot: number };
        self.notify_seller(lot, &event);
        self.notify_buyers(lot.interested_buyers(), &event);

        tracing::info!(lot = number, auctioneer, "Auction opened");
        Ok(())
    }

    pub fn make_bid(&mut self, buyer: &str, number: LotNumber, amount: Money) -> AuctionResult<()> {
        tracing::debug!(operation = "make_bid", buyer, lot = number, %amount, "Message in");
        self.accept_bid(buyer, number, amount)
            .inspect_err(|error| tracing::warn!(operation = "make_bid", %error, "Rejected"))
    }

    fn accept_bid(&mut self, buyer: &str, number: LotNumber, amount: Money) -> AuctionResult<()> {
        require(buyer, "make_bid", "Buyer name")?;
        if !self.buyers.contains_key(buyer) {
            return Err(AuctionError::UnknownBuyer(buyer.to_string()));
        }

        let config = &self.config;
        let lot = self
            .lots
            .get_mut(&number)
            .ok_or(AuctionError::UnknownLot(number))?;
        // a bid the house could not settle is never accepted
        Settlement::new(number, amount, config)?;
        lot.place_bid(buyer, amount, config.increment)?;

        let lot = &self.lots[&number];
        let event = Event::BidAccepted { lot: number, amount };
        if let Some(auctioneer) = lot.auctioneer().and_then(|name| self.auctioneers.get(name)) {
            self.messaging.notify(&auctioneer.address, &event);
        }
        self.notify_buyers(
            lot.interested_buyers().iter().filter(|name| name.as_str() != buyer),
            &event,
        );
        self.notify_seller(lot, &event);
        Ok(())
    }

    /// Close bidding and, if the reserve was reached, settle the sale.
    pub fn close_auction(
        &mut self,
        auctioneer: &str,
        number: LotNumber,
    ) -> AuctionResult<CloseOutcome> {
        tracing::debug!(operation = "close_auction", auctioneer, lot = number, "Message in");
        self.finish_auction(auctioneer, number)
            .inspect_err(|error| tracing::warn!(operation = "close_auction", %error, "Rejected"))
    }

    fn finish_auction(
        &mut self,
        auctioneer: &str,
        number: LotNumber,
    ) -> AuctionResult<CloseOutcome> {
        require(auctioneer, "close_auction", "Auctioneer name")?;

        let lot = self.lot_mut(number)?;
        lot.ensure_closable_by(auctioneer)?;
        let seller_name = lot.seller().to_string();

        let Some(winning_bid) = lot.winning_bid().cloned() else {
            lot.close_as(LotStatus::Unsold)?;
            tracing::info!(lot = number, "Lot unsold, reserve not reached");
            self.notify_lot_closed(number, &Event::LotUnsold { lot: number });
            return Ok(CloseOutcome::NoSale { lot: number });
        };

        let buyer = self
            .buyers
            .get(&winning_bid.buyer)
            .ok_or_else(|| AuctionError::UnknownBuyer(winning_bid.buyer.clone()))?;
        let seller = self
            .sellers
            .get(&seller_name)
            .ok_or(AuctionError::UnknownSeller(seller_name.clone()))?;

        let settlement = Settlement::new(number, winning_bid.amount, &self.config)?;
        let payment = settlement.execute(self.banking.as_ref(), buyer, seller, &self.config);

        match payment {
            Ok(()) => {
                self.lot_mut(number)?.close_as(LotStatus::Sold)?;
                tracing::info!(
                    lot = number,
                    hammer_price = %settlement.hammer_price,
                    house_margin = %settlement.house_margin,
                    buyer = %winning_bid.buyer,
                    "Lot sold"
                );
                self.notify_lot_closed(number, &Event::LotSold { lot: number });
                Ok(CloseOutcome::Sale(settlement))
            }
            Err(failure) => {
                self.lot_mut(number)?.close_as(LotStatus::SoldPendingPayment)?;
                tracing::warn!(lot = number, %failure, "Lot sold, payment pending");
                Ok(CloseOutcome::SalePendingPayment { settlement, failure })
            }
        }
    }

    // === Helpers ===

    fn lot_mut(&mut self, number: LotNumber) -> AuctionResult<&mut Lot> {
        self.lots
            .get_mut(&number)
            .ok_or(AuctionError::UnknownLot(number))
    }

    fn notify_buyers<'a>(&self, names: impl IntoIterator<Item = &'a String>, event: &Event) {
        for buyer in names.into_iter().filter_map(|name| self.buyers.get(name)) {
            self.messaging.notify(&buyer.address, event);
        }
    }

    fn notify_seller(&self, lot: &Lot, event: &Event) {
        if let Some(seller) = self.sellers.get(lot.seller()) {
            self.messaging.notify(&seller.address, event);
        }
    }

    /// Tell everyone following a lot how it closed
    fn notify_lot_closed(&self, number: LotNumber, event: &Event) {
        if let Some(lot) = self.lots.get(&number) {
            self.notify_buyers(lot.interested_buyers(), event);
            self.notify_seller(lot, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auctionhouse_services::{MockBankingService, MockMessagingService};

    fn pounds(pounds: i64) -> Money {
        Money::from_pence(pounds * 100)
    }

    fn create_house() -> (AuctionHouse, Arc<MockMessagingService>, Arc<MockBankingService>) {
        let messaging = Arc::new(MockMessagingService::new());
        let banking = Arc::new(MockBankingService::new());
        let house = AuctionHouse::new(HouseConfig::default(), messaging.clone(), banking.clone());
        (house, messaging, banking)
    }

    /// One seller, one lot (reserve 80), two interested buyers
    fn house_with_lot() -> (AuctionHouse, Arc<MockMessagingService>, Arc<MockBankingService>) {
        let (mut house, messaging, banking) = create_house();
        house.register_seller("SellerY", "@SellerY", "SY A/C").unwrap();
        house.add_lot("SellerY", 1, "Bicycle", pounds(80)).unwrap();
        house
            .register_buyer("BuyerA", "@BuyerA", "BA A/C", "BA-auth")
            .unwrap();
        house
            .register_buyer("BuyerB", "@BuyerB", "BB A/C", "BB-auth")
            .unwrap();
        house.note_interest("BuyerA", 1).unwrap();
        house.note_interest("BuyerB", 1).unwrap();
        (house, messaging, banking)
    }

    #[test]
    fn test_register_buyer_empty_fields() {
        let (mut house, _, _) = create_house();
        let result = house.register_buyer("BuyerA", "", "BA A/C", "BA-auth");
        assert!(matches!(
            result,
            Err(AuctionError::EmptyField { field: "Address", .. })
        ));
        assert!(house.register_buyer("BuyerA", "@BuyerA", "BA A/C", "").is_err());
        assert!(house.buyer("BuyerA").is_none());
    }

    #[test]
    fn test_register_duplicate_buyer() {
        let (mut house, _, _) = create_house();
        house
            .register_buyer("BuyerA", "@BuyerA", "BA A/C", "BA-auth")
            .unwrap();
        let result = house.register_buyer("BuyerA", "@Other", "XX A/C", "XX-auth");
        assert!(matches!(result, Err(AuctionError::BuyerAlreadyRegistered(_))));
        assert_eq!(house.buyer("BuyerA").unwrap().address, "@BuyerA");
    }

    #[test]
    fn test_buyer_and_seller_names_are_separate() {
        let (mut house, _, _) = create_house();
        house.register_seller("Sam", "@Sam", "S A/C").unwrap();
        assert!(house.register_buyer("Sam", "@Sam", "S A/C", "S-auth").is_ok());
    }

    #[test]
    fn test_add_lot_validation() {
        let (mut house, _, _) = create_house();
        house.register_seller("SellerY", "@SellerY", "SY A/C").unwrap();

        assert!(matches!(
            house.add_lot("Nobody", 1, "Lamp", pounds(10)),
            Err(AuctionError::UnknownSeller(_))
        ));
        assert!(matches!(
            house.add_lot("SellerY", 1, "", pounds(10)),
            Err(AuctionError::EmptyField { .. })
        ));
        assert!(matches!(
            house.add_lot("SellerY", 1, "Lamp", Money::ZERO),
            Err(AuctionError::InvalidReservePrice(_))
        ));
        house.add_lot("SellerY", 1, "Lamp", pounds(10)).unwrap();
        assert!(matches!(
            house.add_lot("SellerY", 1, "Chair", pounds(60)),
            Err(AuctionError::LotAlreadyExists(1))
        ));
        assert_eq!(house.lot(1).unwrap().description(), "Lamp");
    }

    #[test]
    fn test_note_interest_unknown_buyer_or_lot() {
        let (mut house, _, _) = house_with_lot();
        assert!(matches!(
            house.note_interest("BuyerZ", 1),
            Err(AuctionError::UnknownBuyer(_))
        ));
        assert!(matches!(
            house.note_interest("BuyerA", 9),
            Err(AuctionError::UnknownLot(9))
        ));
    }

    #[test]
    fn test_open_registers_auctioneer_once() {
        let (mut house, _, _) = house_with_lot();
        house.register_seller("SellerZ", "@SellerZ", "SZ A/C").unwrap();
        house.add_lot("SellerZ", 2, "Table", pounds(100)).unwrap();

        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        house.open_auction("Auctioneer1", "@Elsewhere", 2).unwrap();
        assert_eq!(
            house.auctioneer("Auctioneer1").unwrap().address,
            "@Auctioneer1"
        );
    }

    #[test]
    fn test_failed_open_does_not_register_auctioneer() {
        let (mut house, messaging, _) = house_with_lot();
        assert!(house.open_auction("Auctioneer1", "@Auctioneer1", 7).is_err());
        assert!(house.auctioneer("Auctioneer1").is_none());
        assert!(messaging.sent().is_empty());
    }

    #[test]
    fn test_open_notifies_seller_and_interested_buyers() {
        let (mut house, messaging, _) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();

        messaging.expect_auction_opened("@SellerY", 1);
        messaging.expect_auction_opened("@BuyerA", 1);
        messaging.expect_auction_opened("@BuyerB", 1);
        messaging.verify().unwrap();
    }

    #[test]
    fn test_bid_not_sent_back_to_bidder() {
        let (mut house, messaging, _) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        messaging.reset();

        house.make_bid("BuyerA", 1, pounds(70)).unwrap();
        assert!(messaging.sent_to("@BuyerA").is_empty());
        messaging.expect_bid_accepted("@BuyerB", 1, pounds(70));
        messaging.expect_bid_accepted("@Auctioneer1", 1, pounds(70));
        messaging.expect_bid_accepted("@SellerY", 1, pounds(70));
        messaging.verify().unwrap();
    }

    #[test]
    fn test_rejected_bid_sends_nothing() {
        let (mut house, messaging, _) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        messaging.reset();

        house.make_bid("BuyerA", 1, pounds(70)).unwrap();
        messaging.reset();

        assert!(matches!(
            house.make_bid("BuyerB", 1, pounds(75)),
            Err(AuctionError::BidTooLow { .. })
        ));
        assert!(messaging.sent().is_empty());
        assert_eq!(house.lot(1).unwrap().highest_bidder(), Some("BuyerA"));
    }

    #[test]
    fn test_bid_too_large_to_settle_rejected() {
        let (mut house, messaging, banking) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        messaging.reset();

        let huge: Money = "79228162514264337593543950335".parse().unwrap();
        assert!(matches!(
            house.make_bid("BuyerA", 1, huge),
            Err(AuctionError::AmountOutOfRange { lot: 1, .. })
        ));
        assert!(house.lot(1).unwrap().bids().is_empty());
        assert!(messaging.sent().is_empty());

        // the lot still closes normally
        let outcome = house.close_auction("Auctioneer1", 1).unwrap();
        assert_eq!(outcome, CloseOutcome::NoSale { lot: 1 });
        assert!(banking.transfers().is_empty());
    }

    #[test]
    fn test_largest_settleable_bid_closes_without_panic() {
        let (mut house, _, banking) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();

        // with a 10% premium, anything above MAX / 1.1 cannot be charged
        let big: Money = "70000000000000000000000000000".parse().unwrap();
        house.make_bid("BuyerA", 1, big).unwrap();
        assert!(house.make_bid("BuyerB", 1, big).is_err());

        let outcome = house.close_auction("Auctioneer1", 1).unwrap();
        assert_eq!(outcome.kind(), StatusKind::Sale);
        assert_eq!(banking.transfers().len(), 2);
    }

    #[test]
    fn test_close_without_bids_is_no_sale() {
        let (mut house, messaging, banking) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        messaging.reset();

        let outcome = house.close_auction("Auctioneer1", 1).unwrap();
        assert_eq!(outcome, CloseOutcome::NoSale { lot: 1 });
        assert_eq!(house.lot(1).unwrap().status(), LotStatus::Unsold);
        assert!(banking.transfers().is_empty());

        messaging.expect_lot_unsold("@BuyerA", 1);
        messaging.expect_lot_unsold("@BuyerB", 1);
        messaging.expect_lot_unsold("@SellerY", 1);
        messaging.verify().unwrap();
    }

    #[test]
    fn test_close_at_exact_reserve_is_sale() {
        let (mut house, _, _) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        house.make_bid("BuyerB", 1, pounds(80)).unwrap();

        let outcome = house.close_auction("Auctioneer1", 1).unwrap();
        assert_eq!(outcome.kind(), StatusKind::Sale);
        assert_eq!(house.lot(1).unwrap().status(), LotStatus::Sold);
    }

    #[test]
    fn test_close_by_other_auctioneer_rejected() {
        let (mut house, _, _) = house_with_lot();
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();

        assert!(matches!(
            house.close_auction("Auctioneer2", 1),
            Err(AuctionError::WrongAuctioneer { .. })
        ));
        assert_eq!(house.lot(1).unwrap().status(), LotStatus::InAuction);
    }

    #[test]
    fn test_failed_payment_leaves_sale_pending() {
        let (mut house, messaging, banking) = house_with_lot();
        banking.fail_account("BB A/C");
        house.open_auction("Auctioneer1", "@Auctioneer1", 1).unwrap();
        house.make_bid("BuyerB", 1, pounds(100)).unwrap();
        messaging.reset();

        let outcome = house.close_auction("Auctioneer1", 1).unwrap();
        assert!(matches!(
            outcome,
            CloseOutcome::SalePendingPayment {
                failure: PaymentFailure::Buyer(_),
                ..
            }
        ));
        assert_eq!(house.lot(1).unwrap().status(), LotStatus::SoldPendingPayment);
        assert!(messaging.sent().is_empty());

        // no payout to the seller when the buyer did not pay
        banking.expect_transfer("BB A/C", "BB-auth", "AH A/C", pounds(110));
        banking.verify().unwrap();
    }

    #[test]
    fn test_catalogue_in_lot_number_order() {
        let (mut house, _, _) = create_house();
        house.register_seller("SellerY", "@SellerY", "SY A/C").unwrap();
        house.add_lot("SellerY", 5, "Table", pounds(100)).unwrap();
        house.add_lot("SellerY", 2, "Painting", pounds(200)).unwrap();
        house.add_lot("SellerY", 1, "Bicycle", pounds(80)).unwrap();

        let numbers: Vec<LotNumber> = house.view_catalogue().iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 5]);
    }
}
