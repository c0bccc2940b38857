//! Catalogue - the public view of listed lots

use auctionhouse_core::LotNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lot::LotStatus;

/// One catalogue line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub number: LotNumber,
    pub description: String,
    pub status: LotStatus,
}

impl CatalogueEntry {
    pub fn new(number: LotNumber, description: impl Into<String>, status: LotStatus) -> Self {
        Self {
            number,
            description: description.into(),
            status,
        }
    }
}

impl fmt::Display for CatalogueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {:<20} {}", self.number, self.description, self.status)
    }
}
