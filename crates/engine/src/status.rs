//! Folding operation results into the uniform `Status`

use auctionhouse_core::{Status, StatusKind};

use crate::error::{AuctionError, AuctionResult};
use crate::house::CloseOutcome;

impl From<AuctionError> for Status {
    fn from(error: AuctionError) -> Self {
        Status::error(error.to_string())
    }
}

impl From<CloseOutcome> for Status {
    fn from(outcome: CloseOutcome) -> Self {
        match outcome {
            CloseOutcome::Sale(settlement) => Status::new(
                StatusKind::Sale,
                format!(
                    "Lot {} sold for {}",
                    settlement.lot, settlement.hammer_price
                ),
            ),
            CloseOutcome::NoSale { lot } => Status::new(
                StatusKind::NoSale,
                format!("Lot {} was not sold: reserve price not reached", lot),
            ),
            CloseOutcome::SalePendingPayment { settlement, failure } => Status::new(
                StatusKind::SalePendingPayment,
                format!("Lot {} awaiting payment: {}", settlement.lot, failure),
            ),
        }
    }
}

/// Convert an operation result into a `Status` (kind + message)
pub trait IntoStatus {
    fn into_status(self) -> Status;
}

impl IntoStatus for AuctionResult<()> {
    fn into_status(self) -> Status {
        match self {
            Ok(()) => Status::ok(),
            Err(error) => error.into(),
        }
    }
}

impl IntoStatus for AuctionResult<CloseOutcome> {
    fn into_status(self) -> Status {
        match self {
            Ok(outcome) => outcome.into(),
            Err(error) => error.into(),
        }
    }
}
