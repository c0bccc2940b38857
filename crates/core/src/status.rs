//! Status - uniform outcome returned by auction house operations and collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome kind
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Operation succeeded
    Ok,
    /// Operation rejected or failed
    Error,
    /// Lot sold and both transfers completed
    Sale,
    /// Lot closed without reaching its reserve
    NoSale,
    /// Lot sold but a bank transfer failed
    SalePendingPayment,
}

/// Kind plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusKind::Ok, "")
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }

    pub fn is_ok(&self) -> bool {
        self.kind == StatusKind::Ok
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}
