//! Fee rate configuration.
//!
//! Held per ledger instance, never process-global: two ledgers (two
//! securities, two sessions) can carry independent rates. Updates are
//! all-or-nothing — a candidate that fails to parse leaves the existing
//! configuration untouched.

use crate::domain::Decimal;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fee rates applied when a trade is appended.
///
/// All fields are finite and non-negative; `from_candidate` enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Proportional broker commission on the gross amount.
    pub commission_rate: Decimal,
    /// Commission floor per trade.
    pub min_commission: Decimal,
    /// Proportional transfer fee on the gross amount.
    pub transfer_rate: Decimal,
    /// Proportional stamp tax on the gross amount, sell side only.
    pub stamp_tax_rate: Decimal,
}

impl Default for RateConfig {
    fn default() -> Self {
        RateConfig {
            // Typical A-share retail rates.
            commission_rate: Decimal::new(RustDecimal::new(25, 5)), // 0.00025
            min_commission: Decimal::new(RustDecimal::new(5, 0)),   // 5
            transfer_rate: Decimal::new(RustDecimal::new(1, 5)),    // 0.00001
            stamp_tax_rate: Decimal::new(RustDecimal::new(5, 4)),   // 0.0005
        }
    }
}

/// Raw, unparsed rate fields as an input layer hands them over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateCandidate {
    pub commission_rate: String,
    pub min_commission: String,
    pub transfer_rate: String,
    pub stamp_tax_rate: String,
}

#[derive(Debug, Error)]
pub enum RateConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
}

impl RateConfig {
    /// Parse a candidate into a full configuration.
    ///
    /// All four fields must parse as non-negative decimals; the first field
    /// that fails is reported and nothing is applied.
    pub fn from_candidate(candidate: &RateCandidate) -> Result<Self, RateConfigError> {
        Ok(RateConfig {
            commission_rate: parse_rate("commission_rate", &candidate.commission_rate)?,
            min_commission: parse_rate("min_commission", &candidate.min_commission)?,
            transfer_rate: parse_rate("transfer_rate", &candidate.transfer_rate)?,
            stamp_tax_rate: parse_rate("stamp_tax_rate", &candidate.stamp_tax_rate)?,
        })
    }
}

fn parse_rate(field: &'static str, raw: &str) -> Result<Decimal, RateConfigError> {
    let value = Decimal::from_str_canonical(raw.trim())
        .map_err(|_| RateConfigError::InvalidValue(field, raw.to_string()))?;
    if value.is_negative() {
        return Err(RateConfigError::InvalidValue(field, raw.to_string()));
    }
    Ok(value)
}
