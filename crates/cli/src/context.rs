//! Application context - an auction house wired to the recording mocks

use std::sync::Arc;

use auctionhouse_core::Status;
use auctionhouse_engine::{AuctionHouse, CatalogueEntry, HouseConfig, IntoStatus};
use auctionhouse_services::{MockBankingService, MockMessagingService};

use crate::scenario::Step;

pub struct HouseContext {
    pub house: AuctionHouse,
    pub messaging: Arc<MockMessagingService>,
    pub banking: Arc<MockBankingService>,
}

impl HouseContext {
    pub fn new(config: HouseConfig) -> Self {
        let messaging = Arc::new(MockMessagingService::new());
        let banking = Arc::new(MockBankingService::new());
        let house = AuctionHouse::new(config, messaging.clone(), banking.clone());

        Self {
            house,
            messaging,
            banking,
        }
    }

    /// Mark accounts whose transfers the bank will decline
    pub fn with_failing_accounts<'a>(self, accounts: impl IntoIterator<Item = &'a String>) -> Self {
        for account in accounts {
            self.banking.fail_account(account.as_str());
        }
        self
    }

    /// Run one step against the house
    pub fn apply(&mut self, step: &Step) -> Status {
        let house = &mut self.house;
        match step {
            Step::RegisterBuyer {
                name,
                address,
                bank_account,
                auth_code,
            } => house
                .register_buyer(name, address, bank_account, auth_code)
                .into_status(),
            Step::RegisterSeller {
                name,
                address,
                bank_account,
            } => house
                .register_seller(name, address, bank_account)
                .into_status(),
            Step::AddLot {
                seller,
                number,
                description,
                reserve_price,
            } => house
                .add_lot(seller, *number, description, *reserve_price)
                .into_status(),
            Step::ViewCatalogue => Status::ok(),
            Step::NoteInterest { buyer, lot } => house.note_interest(buyer, *lot).into_status(),
            Step::OpenAuction {
                auctioneer,
                address,
                lot,
            } => house.open_auction(auctioneer, address, *lot).into_status(),
            Step::MakeBid { buyer, lot, amount } => {
                house.make_bid(buyer, *lot, *amount).into_status()
            }
            Step::CloseAuction { auctioneer, lot } => {
                house.close_auction(auctioneer, *lot).into_status()
            }
        }
    }

    pub fn catalogue(&self) -> Vec<CatalogueEntry> {
        self.house.view_catalogue()
    }
}
