//! Position ledger — authoritative state of cash and open positions.
//!
//! The only component permitted to mutate holdings or cash. A ledger is
//! constructed fresh per simulation run and passed explicitly, so
//! independent runs can execute in parallel without shared state.

use crate::domain::{Position, Symbol};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient cash for {symbol}: need {required:.2}, have {available:.2}")]
    InsufficientCash {
        symbol: String,
        required: f64,
        available: f64,
    },

    #[error("position already open for {symbol}")]
    DuplicatePosition { symbol: String },

    #[error("no open position for {symbol}")]
    PositionNotHeld { symbol: String },

    #[error("hold period violated for {symbol}: held {held} days, minimum {minimum}")]
    HoldPeriodViolation {
        symbol: String,
        held: i64,
        minimum: i64,
    },

    #[error("quantity {quantity} is not a positive multiple of lot size {lot_size}")]
    InvalidQuantity { quantity: u64, lot_size: u64 },
}

/// Entry-side record returned by `close`, used to assemble the round-trip
/// trade without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPosition {
    pub symbol: Symbol,
    pub quantity: u64,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// exit_price × quantity, credited to cash.
    pub value: f64,
    pub pnl: f64,
    pub hold_days: i64,
}

/// Cash plus open positions, with lot-size and hold-period enforcement.
#[derive(Debug, Clone)]
pub struct PositionLedger {
    cash: f64,
    lot_size: u64,
    min_hold_days: i64,
    positions: BTreeMap<Symbol, Position>,
    /// Days a held symbol had no usable close (value carried forward).
    price_gaps: HashMap<Symbol, usize>,
}

impl PositionLedger {
    pub fn new(initial_capital: f64, lot_size: u64, min_hold_days: i64) -> Self {
        Self {
            cash: initial_capital,
            lot_size,
            min_hold_days,
            positions: BTreeMap::new(),
            price_gaps: HashMap::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Number of open positions.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_held(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Held symbols in ascending order — the fixed processing order for the
    /// sell phase, independent of panel row ordering.
    pub fn held_symbols(&self) -> Vec<Symbol> {
        self.positions.keys().cloned().collect()
    }

    /// Open a new position, debiting cash.
    pub fn open(
        &mut self,
        symbol: &str,
        price: f64,
        quantity: u64,
        date: NaiveDate,
    ) -> Result<(), LedgerError> {
        if quantity == 0 || quantity % self.lot_size != 0 {
            return Err(LedgerError::InvalidQuantity {
                quantity,
                lot_size: self.lot_size,
            });
        }
        if self.positions.contains_key(symbol) {
            return Err(LedgerError::DuplicatePosition {
                symbol: symbol.to_string(),
            });
        }
        let cost = price * quantity as f64;
        if cost > self.cash {
            return Err(LedgerError::InsufficientCash {
                symbol: symbol.to_string(),
                required: cost,
                available: self.cash,
            });
        }

        self.cash -= cost;
        self.positions.insert(
            symbol.to_string(),
            Position::new(symbol.to_string(), quantity, price, date),
        );

        debug_assert!(self.cash >= 0.0, "cash went negative after open");
        Ok(())
    }

    /// Liquidate a position in full, crediting cash with price × quantity.
    pub fn close(
        &mut self,
        symbol: &str,
        price: f64,
        date: NaiveDate,
    ) -> Result<ClosedPosition, LedgerError> {
        let position = self
            .positions
            .get(symbol)
            .ok_or_else(|| LedgerError::PositionNotHeld {
                symbol: symbol.to_string(),
            })?;

        let held = position.hold_days(date);
        if held < self.min_hold_days {
            return Err(LedgerError::HoldPeriodViolation {
                symbol: symbol.to_string(),
                held,
                minimum: self.min_hold_days,
            });
        }

        let position = self.positions.remove(symbol).expect("presence checked above");
        let value = position.market_value(price);
        self.cash += value;

        Ok(ClosedPosition {
            symbol: position.symbol,
            quantity: position.quantity,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_price: price,
            value,
            pnl: value - position.cost_basis,
            hold_days: held,
        })
    }

    /// Record the day's closes as each held symbol's last known price.
    ///
    /// A held symbol absent from `prices` keeps its previous mark and is
    /// counted as a price gap — a data-quality condition, never fatal.
    pub fn update_marks(&mut self, prices: &HashMap<Symbol, f64>) {
        for (symbol, position) in self.positions.iter_mut() {
            match prices.get(symbol) {
                Some(&price) => position.last_price = price,
                None => {
                    *self.price_gaps.entry(symbol.clone()).or_default() += 1;
                }
            }
        }
    }

    /// Total position value at the day's closes. Pure query; symbols absent
    /// from `prices` are valued at their last known price.
    pub fn mark_to_market(&self, prices: &HashMap<Symbol, f64>) -> f64 {
        self.positions
            .values()
            .map(|pos| {
                let price = prices.get(&pos.symbol).copied().unwrap_or(pos.last_price);
                pos.market_value(price)
            })
            .sum()
    }

    pub fn holdings_snapshot(&self) -> BTreeMap<Symbol, u64> {
        self.positions
            .iter()
            .map(|(symbol, pos)| (symbol.clone(), pos.quantity))
            .collect()
    }

    pub fn price_gaps(&self) -> &HashMap<Symbol, usize> {
        &self.price_gaps
    }
}
