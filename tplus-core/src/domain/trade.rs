//! TradeRecord — a closed round-trip with realized pnl.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A complete round-trip: entry → exit, full liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,

    // ── Entry ──
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    // ── Size ──
    pub quantity: u64,

    // ── PnL ──
    pub pnl: f64,

    // ── Duration ──
    pub hold_days: i64,
}

impl TradeRecord {
    /// Return on the trade as a fraction of entry cost.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.quantity == 0 {
            return 0.0;
        }
        self.pnl / (self.entry_price * self.quantity as f64)
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
