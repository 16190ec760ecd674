//! Portfolio simulator — the strictly sequential day loop.
//!
//! Each day's outcome is the precondition for the next, so days are never
//! processed out of order or concurrently. Parallelism belongs outside this
//! loop: every `simulate` call owns its own ledger, and the panel is shared
//! read-only.

use crate::domain::{DailyLog, SignalEntry, SignalPanel, Symbol, TradeRecord};
use crate::engine::config::SimulationConfig;
use crate::engine::ledger::PositionLedger;
use crate::engine::result::{DailySignalCount, SimulationResult};
use crate::engine::step::{evaluate_day, StepError};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("signal panel is empty; cannot run simulation")]
    EmptyPanel,

    #[error("internal consistency violation on {date}: {source}")]
    InternalConsistency { date: NaiveDate, source: StepError },
}

/// Run the full backtest over `trading_days`, in order.
///
/// Validation is fail-fast: a rejected configuration, an empty or unordered
/// day list, or an empty panel returns an error before any state mutation.
pub fn simulate(
    panel: &SignalPanel,
    trading_days: &[NaiveDate],
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    config
        .validate()
        .map_err(|e| SimulationError::InvalidParameter(e.to_string()))?;
    if trading_days.is_empty() {
        return Err(SimulationError::InvalidParameter(
            "trading_days must be non-empty".to_string(),
        ));
    }
    for pair in trading_days.windows(2) {
        if pair[1] <= pair[0] {
            return Err(SimulationError::InvalidParameter(format!(
                "trading_days must be strictly increasing, got {} after {}",
                pair[1], pair[0]
            )));
        }
    }
    if panel.is_empty() {
        return Err(SimulationError::EmptyPanel);
    }

    let mut ledger = PositionLedger::new(
        config.initial_capital,
        config.lot_size,
        config.min_hold_days,
    );
    let mut equity_curve = Vec::with_capacity(trading_days.len());
    let mut daily_logs = Vec::with_capacity(trading_days.len());
    let mut trades: Vec<TradeRecord> = Vec::new();

    for &date in trading_days {
        let day_rows = panel.day(date);
        let prices = day_prices(day_rows);

        // Marks first, so exits and the equity snapshot both see today's
        // closes, and gaps for held symbols are counted exactly once.
        ledger.update_marks(&prices);

        let outcome = evaluate_day(&mut ledger, config, date, day_rows)
            .map_err(|source| SimulationError::InternalConsistency { date, source })?;

        let equity = ledger.cash() + ledger.mark_to_market(&prices);

        debug_assert!(ledger.cash() >= 0.0, "cash negative on {date}");
        debug_assert!(
            ledger.count() <= config.max_positions,
            "position count {} exceeds max {} on {date}",
            ledger.count(),
            config.max_positions
        );

        for closed in &outcome.closed {
            trades.push(TradeRecord {
                symbol: closed.symbol.clone(),
                entry_date: closed.entry_date,
                entry_price: closed.entry_price,
                exit_date: date,
                exit_price: closed.exit_price,
                quantity: closed.quantity,
                pnl: closed.pnl,
                hold_days: closed.hold_days,
            });
        }

        daily_logs.push(DailyLog {
            date,
            ranked_candidates: outcome.ranked_candidates,
            buys: outcome.buys,
            sells: outcome.sells,
            holdings: ledger.holdings_snapshot(),
            cash: ledger.cash(),
            equity,
        });
        equity_curve.push((date, equity));
    }

    let price_gap_counts: BTreeMap<Symbol, usize> =
        ledger.price_gaps().iter().map(|(s, c)| (s.clone(), *c)).collect();
    let mut data_quality_warnings: Vec<String> = price_gap_counts
        .iter()
        .map(|(symbol, count)| {
            format!("{symbol}: no usable close on {count} day(s), mark carried forward")
        })
        .collect();
    data_quality_warnings.sort();

    Ok(SimulationResult {
        equity_curve,
        trades,
        daily_logs,
        price_gap_counts,
        data_quality_warnings,
    })
}

/// Per-day totals of raw buy/sell signals over the requested days.
pub fn signal_counts(panel: &SignalPanel, trading_days: &[NaiveDate]) -> Vec<DailySignalCount> {
    trading_days
        .iter()
        .map(|&date| {
            let (buys, sells) = panel
                .day(date)
                .map(|rows| {
                    let buys = rows.values().filter(|e| e.buy_signal).count();
                    let sells = rows.values().filter(|e| e.sell_signal).count();
                    (buys, sells)
                })
                .unwrap_or((0, 0));
            DailySignalCount {
                date,
                buy_signals: buys,
                sell_signals: sells,
            }
        })
        .collect()
}

/// Usable closes for the day, keyed by symbol. Rows with NaN or non-positive
/// closes are omitted so holders of those symbols carry their last mark.
fn day_prices(day_rows: Option<&BTreeMap<Symbol, SignalEntry>>) -> HashMap<Symbol, f64> {
    day_rows
        .map(|rows| {
            rows.iter()
                .filter(|(_, entry)| entry.has_valid_close())
                .map(|(symbol, entry)| (symbol.clone(), entry.close))
                .collect()
        })
        .unwrap_or_default()
}
