//! Stateful cost-basis ledger over an append-only trade log.
//!
//! Two cost views run in parallel:
//! - the diluted pool: one running cost basis for the whole position, fees
//!   in, proceeds out, reset whenever a sell exhausts the tracked quantity;
//! - a per-symbol weighted-average tracker, used only to crystallize
//!   realized P/L on each sell.
//!
//! Every mutation (append, delete) re-runs a single deterministic pass over
//! the whole log from zero state. Derived state is never patched
//! incrementally, so it can never diverge from a full recompute.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::{RateCandidate, RateConfig};
use crate::domain::{Annotation, Decimal, Side, Symbol, Trade, TradeId};
use crate::error::LedgerError;

use super::{compute_fees, PoolState, PositionSummary, SymbolAverage};

/// Cost-basis ledger for a single position.
///
/// Single-threaded and synchronous: every operation runs to completion. If
/// an instance is shared across threads, the caller must serialize access
/// behind one lock — the recompute pass reads and writes all derived state.
#[derive(Debug, Clone)]
pub struct Ledger {
    log: Vec<Trade>,
    rates: RateConfig,
    next_id: u64,
    pool: PoolState,
    per_symbol: HashMap<Symbol, SymbolAverage>,
    realized_pnl: Decimal,
}

impl Ledger {
    /// Create an empty ledger with default rates.
    pub fn new() -> Self {
        Self::with_rates(RateConfig::default())
    }

    /// Create an empty ledger with the given rates.
    pub fn with_rates(rates: RateConfig) -> Self {
        Ledger {
            log: Vec::new(),
            rates,
            next_id: 1,
            pool: PoolState::default(),
            per_symbol: HashMap::new(),
            realized_pnl: Decimal::zero(),
        }
    }

    /// Rebuild a ledger from a previously serialized log.
    ///
    /// Functionally identical to replaying the original appends: the
    /// recompute pass reproduces all derived state and overwrites any
    /// persisted annotations. The supplied rates apply to future appends
    /// only; replayed trades keep the fee breakdowns they were stored with.
    pub fn rehydrate(rates: RateConfig, log: Vec<Trade>) -> Self {
        let next_id = log.iter().map(|t| t.id.as_u64() + 1).max().unwrap_or(1);
        let mut ledger = Ledger {
            log,
            rates,
            next_id,
            pool: PoolState::default(),
            per_symbol: HashMap::new(),
            realized_pnl: Decimal::zero(),
        };
        ledger.recompute();
        debug!("rehydrated ledger with {} trades", ledger.log.len());
        ledger
    }

    /// Append a trade, computing its fees from the current rate snapshot,
    /// and recompute both cost-basis views.
    ///
    /// Returns the stored trade with its final annotation.
    ///
    /// # Errors
    /// Rejects non-positive price or quantity and an empty symbol.
    pub fn append_trade(
        &mut self,
        symbol: Symbol,
        display_name: impl Into<String>,
        side: Side,
        price: Decimal,
        quantity: i64,
    ) -> Result<&Trade, LedgerError> {
        if !price.is_positive() {
            return Err(LedgerError::InvalidPrice(price));
        }
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity(quantity));
        }
        if symbol.is_empty() {
            return Err(LedgerError::EmptySymbol);
        }

        let id = TradeId::new(self.next_id);
        self.next_id += 1;

        let fees = compute_fees(side, price, quantity, &self.rates);
        let trade = Trade::new(id, symbol, display_name.into(), side, price, quantity, fees);
        debug!("appending trade {}: {} {} x {}", id, trade.side, quantity, price);

        self.log.push(trade);
        self.recompute();

        let idx = self.log.len() - 1;
        Ok(&self.log[idx])
    }

    /// Remove trades by identity and recompute. Ids not present in the log
    /// are ignored.
    pub fn delete_trades(&mut self, ids: &HashSet<TradeId>) {
        let before = self.log.len();
        self.log.retain(|trade| !ids.contains(&trade.id));
        let removed = before - self.log.len();
        if removed > 0 {
            debug!("deleted {} trade(s)", removed);
        }
        self.recompute();
    }

    /// Replace the rate configuration, all-or-nothing.
    ///
    /// Returns false (and leaves the current rates untouched) if any field
    /// of the candidate fails to parse. Never retroactive: trades already in
    /// the log keep the fee breakdowns computed at their append time.
    pub fn update_rates(&mut self, candidate: &RateCandidate) -> bool {
        match RateConfig::from_candidate(candidate) {
            Ok(rates) => {
                self.rates = rates;
                true
            }
            Err(err) => {
                warn!("rejected rate update: {}", err);
                false
            }
        }
    }

    /// Current rate configuration.
    pub fn rates(&self) -> &RateConfig {
        &self.rates
    }

    /// Read-only projection of the derived state. No recomputation happens
    /// here; state is already consistent after the last mutation.
    pub fn summary(&self) -> PositionSummary {
        PositionSummary {
            held_quantity: self.pool.quantity,
            pooled_cost: self.pool.cost,
            realized_pnl: self.realized_pnl,
        }
    }

    /// The diluted pool.
    pub fn pool(&self) -> PoolState {
        self.pool
    }

    /// Per-symbol weighted-average tracker, if the symbol has been traded.
    pub fn symbol_average(&self, symbol: &Symbol) -> Option<SymbolAverage> {
        self.per_symbol.get(symbol).copied()
    }

    /// The transaction log in chronological order.
    pub fn trades(&self) -> &[Trade] {
        &self.log
    }

    /// Trades most-recent-first, for display.
    pub fn recent_trades(&self) -> impl Iterator<Item = &Trade> {
        self.log.iter().rev()
    }

    /// Single deterministic pass over the full log from zero state.
    ///
    /// Updates the diluted pool, the per-symbol trackers, and the realized
    /// P/L accumulator, and rewrites every trade's annotation. Idempotent on
    /// an unchanged log.
    fn recompute(&mut self) {
        let mut pool = PoolState::default();
        let mut per_symbol: HashMap<Symbol, SymbolAverage> = HashMap::new();
        let mut realized = Decimal::zero();

        for trade in &mut self.log {
            let tracker = per_symbol.entry(trade.symbol.clone()).or_default();
            match trade.side {
                Side::Buy => {
                    let real_cost = trade.real_cost();
                    pool.cost += real_cost;
                    pool.quantity += trade.quantity;
                    tracker.held_cost += real_cost;
                    tracker.held_quantity += trade.quantity;

                    // The pool is never negative entering a buy, so the
                    // average is always defined here.
                    if let Some(cost) = pool.average_cost() {
                        trade.annotation = Some(Annotation::Accumulate { cost });
                    }
                }
                Side::Sell => {
                    let net = trade.net_proceeds();
                    pool.cost -= net;
                    pool.quantity -= trade.quantity;

                    // Per-symbol average taken before the tracker moves.
                    let avg_price = tracker.average_price();
                    let cost_of_sold = avg_price * Decimal::from(trade.quantity);
                    let profit = net - cost_of_sold;
                    realized += profit;
                    tracker.held_quantity -= trade.quantity;
                    tracker.held_cost -= cost_of_sold;

                    if pool.quantity <= 0 {
                        if pool.quantity < 0 {
                            warn!(
                                "trade {} sells {} more than the pool tracks; clamping pool to zero",
                                trade.id, -pool.quantity
                            );
                        }
                        trade.annotation = Some(Annotation::Close { profit });
                        pool = PoolState::default();
                    } else if let Some(cost) = pool.average_cost() {
                        trade.annotation = Some(Annotation::Reduce { cost });
                    }
                }
            }
        }

        self.pool = pool;
        self.per_symbol = per_symbol;
        self.realized_pnl = realized;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn sym() -> Symbol {
        Symbol::new("600519")
    }

    #[test]
    fn test_append_rejects_invalid_input() {
        let mut ledger = Ledger::new();

        assert!(matches!(
            ledger.append_trade(sym(), "Moutai", Side::Buy, d("0"), 100),
            Err(LedgerError::InvalidPrice(_))
        ));
        assert!(matches!(
            ledger.append_trade(sym(), "Moutai", Side::Buy, d("-1"), 100),
            Err(LedgerError::InvalidPrice(_))
        ));
        assert!(matches!(
            ledger.append_trade(sym(), "Moutai", Side::Buy, d("10"), 0),
            Err(LedgerError::InvalidQuantity(0))
        ));
        assert!(matches!(
            ledger.append_trade(Symbol::new(""), "Moutai", Side::Buy, d("10"), 100),
            Err(LedgerError::EmptySymbol)
        ));

        // Nothing was appended and no state moved.
        assert!(ledger.trades().is_empty());
        assert_eq!(ledger.summary().held_quantity, 0);
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut ledger = Ledger::new();
        let first = ledger
            .append_trade(sym(), "Moutai", Side::Buy, d("10"), 100)
            .unwrap()
            .id;
        let second = ledger
            .append_trade(sym(), "Moutai", Side::Buy, d("10"), 100)
            .unwrap()
            .id;
        assert!(second > first);
    }

    #[test]
    fn test_appended_trade_carries_annotation() {
        let mut ledger = Ledger::new();
        let trade = ledger
            .append_trade(sym(), "Moutai", Side::Buy, d("10.00"), 1000)
            .unwrap();
        assert_eq!(
            trade.annotation,
            Some(Annotation::Accumulate { cost: d("10.0051") })
        );
        assert_eq!(trade.total_fee, d("5.1"));
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut ledger = Ledger::new();
        ledger
            .append_trade(sym(), "Moutai", Side::Buy, d("10.00"), 1000)
            .unwrap();
        let before_log = ledger.trades().to_vec();
        let before_summary = ledger.summary();

        let mut ids = HashSet::new();
        ids.insert(TradeId::new(999));
        ledger.delete_trades(&ids);

        assert_eq!(ledger.trades(), before_log.as_slice());
        assert_eq!(ledger.summary(), before_summary);
    }

    #[test]
    fn test_recent_trades_are_reversed() {
        let mut ledger = Ledger::new();
        ledger
            .append_trade(sym(), "Moutai", Side::Buy, d("10"), 100)
            .unwrap();
        ledger
            .append_trade(sym(), "Moutai", Side::Buy, d("11"), 100)
            .unwrap();

        let recent: Vec<_> = ledger.recent_trades().map(|t| t.id.as_u64()).collect();
        assert_eq!(recent, vec![2, 1]);
    }

    #[test]
    fn test_update_rates_swaps_or_leaves() {
        let mut ledger = Ledger::new();
        let original = *ledger.rates();

        let bad = RateCandidate {
            commission_rate: "not-a-number".to_string(),
            min_commission: "5".to_string(),
            transfer_rate: "0.00001".to_string(),
            stamp_tax_rate: "0.0005".to_string(),
        };
        assert!(!ledger.update_rates(&bad));
        assert_eq!(ledger.rates(), &original);

        let good = RateCandidate {
            commission_rate: "0.0003".to_string(),
            min_commission: "1".to_string(),
            transfer_rate: "0".to_string(),
            stamp_tax_rate: "0.001".to_string(),
        };
        assert!(ledger.update_rates(&good));
        assert_eq!(ledger.rates().min_commission, d("1"));
    }
}
