//! Parties known to the house

use serde::Serialize;

/// A registered buyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buyer {
    pub name: String,
    /// Messaging address
    pub address: String,
    pub bank_account: String,
    /// Authorises the house to debit `bank_account`
    #[serde(skip_serializing)]
    pub auth_code: String,
}

impl Buyer {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        bank_account: impl Into<String>,
        auth_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            bank_account: bank_account.into(),
            auth_code: auth_code.into(),
        }
    }
}

/// A registered seller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seller {
    pub name: String,
    pub address: String,
    pub bank_account: String,
}

impl Seller {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        bank_account: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            bank_account: bank_account.into(),
        }
    }
}

/// An auctioneer, known to the house from the first auction they open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Auctioneer {
    pub name: String,
    pub address: String,
}

impl Auctioneer {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}
