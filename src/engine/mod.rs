//! Pure computation engine: fee breakdown and the dual-track cost-basis
//! ledger.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

pub mod fees;
pub mod ledger;

pub use fees::compute_fees;
pub use ledger::Ledger;

/// The diluted pool: one running cost basis across the entire holding
/// history of the position, including all fees paid and all proceeds taken.
///
/// Reset to zero whenever a sell exhausts (or overshoots) the tracked
/// quantity, so `quantity` is never negative after a recompute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
    pub cost: Decimal,
    pub quantity: i64,
}

impl PoolState {
    /// Diluted average cost per share, if any shares are tracked.
    pub fn average_cost(&self) -> Option<Decimal> {
        if self.quantity > 0 {
            Some(self.cost / Decimal::from(self.quantity))
        } else {
            None
        }
    }
}

/// Weighted-average-cost tracker for one symbol, used only to compute
/// realized P/L per sell. Independent of the diluted pool; may go negative
/// on an over-sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolAverage {
    pub held_quantity: i64,
    pub held_cost: Decimal,
}

impl SymbolAverage {
    /// Average cost per held share; zero when flat.
    pub fn average_price(&self) -> Decimal {
        if self.held_quantity > 0 {
            self.held_cost / Decimal::from(self.held_quantity)
        } else {
            Decimal::zero()
        }
    }
}

/// Read-only projection of the ledger's derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    /// Shares tracked by the diluted pool.
    pub held_quantity: i64,
    /// Total cost carried by the diluted pool.
    pub pooled_cost: Decimal,
    /// Cumulative profit/loss crystallized by sells.
    pub realized_pnl: Decimal,
}
