//! Dual-track cost-basis engine for a single security position.
//!
//! An append-only log of buy/sell trades drives two parallel cost views: a
//! diluted pool average across the whole holding history, and a per-symbol
//! weighted-average tracker that crystallizes realized P/L on every sell.
//! Presentation, persistence, and input formatting live outside this crate;
//! callers hand in validated-enough trade parameters and read back the
//! updated aggregates and per-trade annotations.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::{RateCandidate, RateConfig, RateConfigError};
pub use domain::{Annotation, Decimal, FeeBreakdown, Side, Symbol, Trade, TradeId};
pub use engine::{compute_fees, Ledger, PoolState, PositionSummary, SymbolAverage};
pub use error::LedgerError;
