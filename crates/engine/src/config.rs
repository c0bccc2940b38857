//! House configuration with overridable defaults
//!
//! Any field missing from a config file falls back to its default, so a file
//! only needs to name what differs.

use std::path::Path;

use auctionhouse_core::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fees, bidding increment and the house's own bank details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseConfig {
    /// Percentage added to the hammer price and charged to the buyer
    #[serde(default = "default_buyer_premium")]
    pub buyer_premium: Decimal,

    /// Percentage of the hammer price kept from the seller's proceeds
    #[serde(default = "default_commission")]
    pub commission: Decimal,

    /// Minimum amount a bid must beat the current highest bid by
    #[serde(default = "default_increment")]
    pub increment: Money,

    /// Account buyers pay into and sellers are paid from
    #[serde(default = "default_house_bank_account")]
    pub house_bank_account: String,

    /// Authorisation for debiting the house account
    #[serde(default = "default_house_auth_code")]
    pub house_auth_code: String,
}

fn default_buyer_premium() -> Decimal {
    Decimal::new(10, 0)
}

fn default_commission() -> Decimal {
    Decimal::new(15, 0)
}

fn default_increment() -> Money {
    Money::from_pence(1_000)
}

fn default_house_bank_account() -> String {
    "AH A/C".to_string()
}

fn default_house_auth_code() -> String {
    "AH-auth".to_string()
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            buyer_premium: default_buyer_premium(),
            commission: default_commission(),
            increment: default_increment(),
            house_bank_account: default_house_bank_account(),
            house_auth_code: default_house_auth_code(),
        }
    }
}

impl HouseConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: HouseConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the values make sense together
    pub fn validate(&self) -> Result<(), ConfigError> {
        let percent_range = Decimal::ZERO..=Decimal::ONE_HUNDRED;

        if !percent_range.contains(&self.buyer_premium) {
            return Err(ConfigError::Invalid(format!(
                "buyer_premium must be between 0 and 100, got {}",
                self.buyer_premium
            )));
        }
        if !percent_range.contains(&self.commission) {
            return Err(ConfigError::Invalid(format!(
                "commission must be between 0 and 100, got {}",
                self.commission
            )));
        }
        if !self.increment.is_positive() {
            return Err(ConfigError::Invalid(format!(
                "increment must be positive, got {}",
                self.increment
            )));
        }
        if self.house_bank_account.is_empty() {
            return Err(ConfigError::Invalid(
                "house_bank_account cannot be empty".to_string(),
            ));
        }
        if self.house_auth_code.is_empty() {
            return Err(ConfigError::Invalid(
                "house_auth_code cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
