//! Trade record and its derived cost-basis annotation.

use crate::domain::{Decimal, Side, Symbol, TradeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee breakdown for a single trade, computed once at append time from the
/// rate snapshot in effect at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Broker commission, floored at the configured minimum.
    pub commission: Decimal,
    /// Transfer (registration) fee.
    pub transfer_fee: Decimal,
    /// Stamp tax; zero on buys, levied on disposals only.
    pub stamp_tax: Decimal,
    /// Sum of the three components.
    pub total_fee: Decimal,
}

/// Human-readable summary of the post-trade cost-basis state.
///
/// Derived by the ledger's recompute pass; a recompute is authoritative and
/// overwrites whatever was stored before (including rehydrated values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Annotation {
    /// Buy that grew the pool; carries the new diluted average cost.
    Accumulate { cost: Decimal },
    /// Sell that left the pool open; carries the new diluted average cost.
    Reduce { cost: Decimal },
    /// Sell that closed (or overshot) the pool; carries the trade's
    /// realized profit.
    Close { profit: Decimal },
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Accumulate { cost } => write!(f, "accumulate: cost {}", cost.to_fixed(3)),
            Annotation::Reduce { cost } => write!(f, "reduce: cost {}", cost.to_fixed(3)),
            Annotation::Close { profit } => {
                if profit.is_negative() {
                    write!(f, "close: P/L {}", profit.to_fixed(2))
                } else {
                    write!(f, "close: P/L +{}", profit.to_fixed(2))
                }
            }
        }
    }
}

/// A single executed order in the transaction log.
///
/// Immutable from the caller's perspective; owned by the ledger. The only
/// field the ledger ever rewrites is `annotation`, and only inside a
/// recompute pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Stable identity within the owning ledger.
    pub id: TradeId,
    /// Security symbol.
    pub symbol: Symbol,
    /// Display name for the security; opaque to the engine.
    pub display_name: String,
    /// Buy or Sell.
    pub side: Side,
    /// Execution price per share.
    pub price: Decimal,
    /// Number of shares.
    pub quantity: i64,
    /// price * quantity.
    pub gross_amount: Decimal,
    /// Broker commission.
    pub commission: Decimal,
    /// Transfer fee.
    pub transfer_fee: Decimal,
    /// Stamp tax (zero on buys).
    pub stamp_tax: Decimal,
    /// Sum of all fees.
    pub total_fee: Decimal,
    /// Post-trade cost-basis summary; None until a recompute pass has seen
    /// this trade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl Trade {
    /// Create a new Trade with its fee breakdown. The annotation is filled
    /// in by the ledger's recompute pass.
    pub fn new(
        id: TradeId,
        symbol: Symbol,
        display_name: String,
        side: Side,
        price: Decimal,
        quantity: i64,
        fees: FeeBreakdown,
    ) -> Self {
        Trade {
            id,
            symbol,
            display_name,
            side,
            price,
            quantity,
            gross_amount: price * Decimal::from(quantity),
            commission: fees.commission,
            transfer_fee: fees.transfer_fee,
            stamp_tax: fees.stamp_tax,
            total_fee: fees.total_fee,
            annotation: None,
        }
    }

    /// Gross amount plus all fees: what a buy actually costs.
    pub fn real_cost(&self) -> Decimal {
        self.gross_amount + self.total_fee
    }

    /// Gross amount minus all fees: what a sell actually yields.
    pub fn net_proceeds(&self) -> Decimal {
        self.gross_amount - self.total_fee
    }
}
