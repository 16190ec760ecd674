//! Order — a single executed trade event, immutable once logged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// An executed trade event. Created exactly once per execution; the daily
/// log and trade list hold these verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    pub quantity: u64,
    /// price × quantity.
    pub value: f64,
    /// Realized pnl against cost basis; sells only.
    pub pnl: Option<f64>,
    /// Calendar days between entry and exit; sells only.
    pub hold_days: Option<i64>,
}

impl Order {
    pub fn buy(date: NaiveDate, symbol: String, price: f64, quantity: u64) -> Self {
        Self {
            date,
            symbol,
            side: Side::Buy,
            price,
            quantity,
            value: price * quantity as f64,
            pnl: None,
            hold_days: None,
        }
    }

    pub fn sell(
        date: NaiveDate,
        symbol: String,
        price: f64,
        quantity: u64,
        pnl: f64,
        hold_days: i64,
    ) -> Self {
        Self {
            date,
            symbol,
            side: Side::Sell,
            price,
            quantity,
            value: price * quantity as f64,
            pnl: Some(pnl),
            hold_days: Some(hold_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_order_has_no_pnl() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let order = Order::buy(date, "600000.SH".into(), 10.0, 500);
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.value, 5_000.0);
        assert!(order.pnl.is_none());
        assert!(order.hold_days.is_none());
    }

    #[test]
    fn sell_order_carries_pnl_and_hold() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let order = Order::sell(date, "600000.SH".into(), 11.0, 500, 500.0, 1);
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.value, 5_500.0);
        assert_eq!(order.pnl, Some(500.0));
        assert_eq!(order.hold_days, Some(1));
    }

    #[test]
    fn order_serialization_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let order = Order::sell(date, "600000.SH".into(), 11.0, 500, 500.0, 1);
        let json = serde_json::to_string(&order).unwrap();
        let deser: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deser);
    }
}
