//! Signal panel — the (date, symbol)-keyed input contract of the simulator.
//!
//! The panel is produced upstream (indicator and signal computation are not
//! this crate's concern); the engine treats any table satisfying this shape
//! as valid input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One (date, symbol) observation supplied by the upstream panel builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPanelRow {
    pub date: NaiveDate,
    pub symbol: String,
    /// Last traded price for the day. A NaN or non-positive value is kept and
    /// treated as a data gap at simulation time, not rejected here.
    pub close: f64,
    pub buy_signal: bool,
    pub sell_signal: bool,
    /// Ranking strength among simultaneous buy candidates; higher is preferred.
    pub score: f64,
}

/// The per-symbol fields of a row, stored under its (date, symbol) key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalEntry {
    pub close: f64,
    pub buy_signal: bool,
    pub sell_signal: bool,
    pub score: f64,
}

impl SignalEntry {
    /// Whether the close is usable as an execution or marking price.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("duplicate panel row for {symbol} on {date}")]
    DuplicateRow { date: NaiveDate, symbol: String },
}

/// Immutable (date, symbol)-keyed signal table.
///
/// Day slices iterate symbol-ascending, so downstream processing never
/// depends on the order rows arrived in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalPanel {
    days: BTreeMap<NaiveDate, BTreeMap<String, SignalEntry>>,
    row_count: usize,
}

impl SignalPanel {
    /// Build a panel from rows, rejecting duplicate (date, symbol) keys.
    ///
    /// NaN scores are normalized to 0.0 at this boundary — they would
    /// otherwise make candidate ranking order unpredictable.
    pub fn from_rows(rows: impl IntoIterator<Item = SignalPanelRow>) -> Result<Self, PanelError> {
        let mut days: BTreeMap<NaiveDate, BTreeMap<String, SignalEntry>> = BTreeMap::new();
        let mut row_count = 0usize;

        for row in rows {
            let entry = SignalEntry {
                close: row.close,
                buy_signal: row.buy_signal,
                sell_signal: row.sell_signal,
                score: if row.score.is_nan() { 0.0 } else { row.score },
            };
            let day = days.entry(row.date).or_default();
            if day.insert(row.symbol.clone(), entry).is_some() {
                return Err(PanelError::DuplicateRow {
                    date: row.date,
                    symbol: row.symbol,
                });
            }
            row_count += 1;
        }

        Ok(Self { days, row_count })
    }

    /// All rows for one trading day, symbol-ascending. `None` when the panel
    /// carries no data for the day.
    pub fn day(&self, date: NaiveDate) -> Option<&BTreeMap<String, SignalEntry>> {
        self.days.get(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// Iterate every row in canonical (date, symbol) order.
    pub fn rows(&self) -> impl Iterator<Item = SignalPanelRow> + '_ {
        self.days.iter().flat_map(|(date, symbols)| {
            symbols.iter().map(move |(symbol, entry)| SignalPanelRow {
                date: *date,
                symbol: symbol.clone(),
                close: entry.close,
                buy_signal: entry.buy_signal,
                sell_signal: entry.sell_signal,
                score: entry.score,
            })
        })
    }
}
