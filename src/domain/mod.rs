//! Domain types for the cost-basis ledger.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: TradeId, Symbol, Side
//! - The Trade record with its fee breakdown and derived annotation

pub mod decimal;
pub mod primitives;
pub mod trade;

pub use decimal::Decimal;
pub use primitives::{Side, Symbol, TradeId};
pub use trade::{Annotation, FeeBreakdown, Trade};
