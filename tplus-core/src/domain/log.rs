//! DailyLog — the simulator's per-day observation record.

use super::order::Order;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record per trading day, in trading-day order.
///
/// `ranked_candidates` is the full buy-eligible universe for the day
/// (score-descending, ties symbol-ascending), logged even when no slot or
/// cash was available — the log records what the strategy wanted to do,
/// not just what it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub ranked_candidates: Vec<(String, f64)>,
    pub buys: Vec<Order>,
    pub sells: Vec<Order>,
    /// Holdings after the day's activity, symbol → quantity.
    pub holdings: BTreeMap<String, u64>,
    pub cash: f64,
    /// cash + Σ(held quantity × day's close, carried forward across gaps).
    pub equity: f64,
}
