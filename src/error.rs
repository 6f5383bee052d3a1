use crate::domain::Decimal;
use thiserror::Error;

/// Rejected trade input.
///
/// The fee math and the cost pools assume a positive price and quantity, so
/// the ledger refuses anything else up front rather than silently producing
/// negative fees.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Trade price must be positive, got {0}")]
    InvalidPrice(Decimal),
    #[error("Trade quantity must be positive, got {0}")]
    InvalidQuantity(i64),
    #[error("Trade symbol must not be empty")]
    EmptySymbol,
}
