//! Simulation result — equity curve, round-trip trades, per-day logs.

use crate::domain::{DailyLog, Symbol, TradeRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate output of a complete run.
///
/// Constructed exclusively by the simulator; read-only to all consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Total portfolio value per trading day, one entry per day in order.
    pub equity_curve: Vec<(NaiveDate, f64)>,
    /// Closed round-trips in exit order.
    pub trades: Vec<TradeRecord>,
    pub daily_logs: Vec<DailyLog>,
    /// Days each held symbol had no usable close (mark carried forward).
    pub price_gap_counts: BTreeMap<Symbol, usize>,
    pub data_quality_warnings: Vec<String>,
}

impl SimulationResult {
    pub fn final_equity(&self) -> f64 {
        self.equity_curve.last().map(|(_, eq)| *eq).unwrap_or(0.0)
    }

    /// Equity values without dates, for metric computation.
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|(_, eq)| *eq).collect()
    }
}

/// Per-day totals of raw panel signals, independent of ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySignalCount {
    pub date: NaiveDate,
    pub buy_signals: usize,
    pub sell_signals: usize,
}
