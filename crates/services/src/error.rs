//! Mock verification errors

use thiserror::Error;

/// Raised when a mock saw different calls than the test expected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Notifications differ: expected {expected:?}, sent {actual:?}")]
    Notifications {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Transfers differ: expected {expected:?}, made {actual:?}")]
    Transfers {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}
