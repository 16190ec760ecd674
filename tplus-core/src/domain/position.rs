//! Position — an open holding created by a BUY and destroyed by a full SELL.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An open holding. Never averaged into: a symbol already held is not
/// eligible as a new buy candidate, so quantity and cost basis are fixed
/// from entry to exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    /// Share count; always a positive multiple of the configured lot size.
    pub quantity: u64,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub cost_basis: f64,
    /// Last usable close observed for this symbol, carried forward across
    /// data gaps so the holding's value is never silently lost.
    pub last_price: f64,
}

impl Position {
    pub fn new(symbol: String, quantity: u64, entry_price: f64, entry_date: NaiveDate) -> Self {
        Self {
            symbol,
            quantity,
            entry_date,
            entry_price,
            cost_basis: quantity as f64 * entry_price,
            last_price: entry_price,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }

    /// Calendar days held as of `date`.
    pub fn hold_days(&self, date: NaiveDate) -> i64 {
        (date - self.entry_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_basis_from_entry() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let pos = Position::new("600000.SH".into(), 500, 10.0, date);
        assert_eq!(pos.cost_basis, 5_000.0);
        assert_eq!(pos.last_price, 10.0);
    }

    #[test]
    fn market_value_and_unrealized() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let pos = Position::new("600000.SH".into(), 500, 10.0, date);
        assert_eq!(pos.market_value(11.0), 5_500.0);
        assert_eq!(pos.unrealized_pnl(11.0), 500.0);
        assert_eq!(pos.unrealized_pnl(9.0), -500.0);
    }

    #[test]
    fn hold_days_calendar_based() {
        let entry = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let pos = Position::new("600000.SH".into(), 100, 10.0, entry);
        assert_eq!(pos.hold_days(entry), 0);
        // Friday to Monday is 3 calendar days.
        assert_eq!(pos.hold_days(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()), 3);
    }
}
