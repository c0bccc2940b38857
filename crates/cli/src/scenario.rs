//! Scenario files
//!
//! A scenario is a JSON document listing house operations in order:
//!
//! ```json
//! {
//!   "failing_accounts": ["BB A/C"],
//!   "steps": [
//!     { "action": "register_seller", "name": "SellerY", "address": "@SellerY", "bank_account": "SY A/C" },
//!     { "action": "add_lot", "seller": "SellerY", "number": 1, "description": "Bicycle", "reserve_price": "80.00" }
//!   ]
//! }
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Context;
use auctionhouse_core::{LotNumber, Money};
use auctionhouse_engine::HouseConfig;
use serde::{Deserialize, Serialize};

/// A scripted run of the auction house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Overrides the default house configuration
    #[serde(default)]
    pub config: Option<HouseConfig>,

    /// Bank accounts whose transfers the mock bank declines
    #[serde(default)]
    pub failing_accounts: Vec<String>,

    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))
    }
}

/// One house operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    RegisterBuyer {
        name: String,
        address: String,
        bank_account: String,
        auth_code: String,
    },
    RegisterSeller {
        name: String,
        address: String,
        bank_account: String,
    },
    AddLot {
        seller: String,
        number: LotNumber,
        description: String,
        reserve_price: Money,
    },
    ViewCatalogue,
    NoteInterest {
        buyer: String,
        lot: LotNumber,
    },
    OpenAuction {
        auctioneer: String,
        address: String,
        lot: LotNumber,
    },
    MakeBid {
        buyer: String,
        lot: LotNumber,
        amount: Money,
    },
    CloseAuction {
        auctioneer: String,
        lot: LotNumber,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::RegisterBuyer { name, .. } => write!(f, "register buyer {}", name),
            Step::RegisterSeller { name, .. } => write!(f, "register seller {}", name),
            Step::AddLot {
                seller,
                number,
                description,
                reserve_price,
            } => write!(
                f,
                "add lot {} '{}' for {} (reserve {})",
                number, description, seller, reserve_price
            ),
            Step::ViewCatalogue => write!(f, "view catalogue"),
            Step::NoteInterest { buyer, lot } => write!(f, "{} notes interest in lot {}", buyer, lot),
            Step::OpenAuction { auctioneer, lot, .. } => {
                write!(f, "{} opens lot {}", auctioneer, lot)
            }
            Step::MakeBid { buyer, lot, amount } => {
                write!(f, "{} bids {} on lot {}", buyer, amount, lot)
            }
            Step::CloseAuction { auctioneer, lot } => write!(f, "{} closes lot {}", auctioneer, lot),
        }
    }
}
