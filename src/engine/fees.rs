//! Fee computation for a single trade.

use crate::config::RateConfig;
use crate::domain::{Decimal, FeeBreakdown, Side};

/// Compute the fee breakdown for a trade.
///
/// Referentially transparent, no validation: callers are expected to have
/// range-checked price and quantity already (the ledger does). Stamp tax is
/// levied on disposals only — a domain rule, not an omission.
pub fn compute_fees(side: Side, price: Decimal, quantity: i64, rates: &RateConfig) -> FeeBreakdown {
    let gross = price * Decimal::from(quantity);

    let commission = (gross * rates.commission_rate).max(rates.min_commission);
    let transfer_fee = gross * rates.transfer_rate;
    let stamp_tax = match side {
        Side::Sell => gross * rates.stamp_tax_rate,
        Side::Buy => Decimal::zero(),
    };

    FeeBreakdown {
        commission,
        transfer_fee,
        stamp_tax,
        total_fee: commission + transfer_fee + stamp_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_buy_commission_floored_at_minimum() {
        // 1000 * 10.00 = 10000; proportional commission 2.5 < floor 5.
        let fees = compute_fees(Side::Buy, d("10.00"), 1000, &RateConfig::default());
        assert_eq!(fees.commission, d("5"));
        assert_eq!(fees.transfer_fee, d("0.1"));
        assert!(fees.stamp_tax.is_zero());
        assert_eq!(fees.total_fee, d("5.1"));
    }

    #[test]
    fn test_buy_commission_proportional_above_floor() {
        // 10000 * 10.00 = 100000; proportional commission 25 > floor 5.
        let fees = compute_fees(Side::Buy, d("10.00"), 10000, &RateConfig::default());
        assert_eq!(fees.commission, d("25"));
        assert_eq!(fees.transfer_fee, d("1"));
        assert!(fees.stamp_tax.is_zero());
        assert_eq!(fees.total_fee, d("26"));
    }

    #[test]
    fn test_sell_adds_stamp_tax() {
        // 1000 * 11.00 = 11000; commission max(2.75, 5) = 5, tax 5.5.
        let fees = compute_fees(Side::Sell, d("11.00"), 1000, &RateConfig::default());
        assert_eq!(fees.commission, d("5"));
        assert_eq!(fees.transfer_fee, d("0.11"));
        assert_eq!(fees.stamp_tax, d("5.5"));
        assert_eq!(fees.total_fee, d("10.61"));
    }

    #[test]
    fn test_zero_rates_yield_zero_fees() {
        let rates = RateConfig {
            commission_rate: Decimal::zero(),
            min_commission: Decimal::zero(),
            transfer_rate: Decimal::zero(),
            stamp_tax_rate: Decimal::zero(),
        };
        let fees = compute_fees(Side::Sell, d("11.00"), 1000, &rates);
        assert!(fees.total_fee.is_zero());
    }

    #[test]
    fn test_fees_deterministic() {
        let rates = RateConfig::default();
        let a = compute_fees(Side::Sell, d("11.00"), 1000, &rates);
        let b = compute_fees(Side::Sell, d("11.00"), 1000, &rates);
        assert_eq!(a, b);
    }
}
