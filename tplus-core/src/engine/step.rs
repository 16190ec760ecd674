//! Daily step evaluator — sells first, then ranked equal-weight buys.
//!
//! Sells are processed before buys so capital and slots freed by exits are
//! available to the same day's entries. Both phases walk symbols in a fixed
//! deterministic order, so execution never depends on incidental panel
//! ordering.

use crate::domain::{Order, SignalEntry, Symbol};
use crate::engine::config::SimulationConfig;
use crate::engine::ledger::{ClosedPosition, LedgerError, PositionLedger};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

/// The day's executed orders and candidate ranking, for logging.
#[derive(Debug, Clone, Default)]
pub struct DayOutcome {
    /// Full buy-eligible universe, score-descending (ties symbol-ascending).
    pub ranked_candidates: Vec<(Symbol, f64)>,
    pub buys: Vec<Order>,
    pub sells: Vec<Order>,
    /// Entry-side detail for each sell, for round-trip trade assembly.
    pub closed: Vec<ClosedPosition>,
}

/// A ledger rejection reaching the evaluator means its own eligibility
/// checks were bypassed — a programming error, not a market condition.
/// The run aborts rather than continue on a corrupted ledger.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("internal consistency violation: {0}")]
    InternalConsistency(#[from] LedgerError),
}

/// Apply the sell rule, then the buy rule, for one trading day.
pub fn evaluate_day(
    ledger: &mut PositionLedger,
    config: &SimulationConfig,
    date: NaiveDate,
    day_rows: Option<&BTreeMap<Symbol, SignalEntry>>,
) -> Result<DayOutcome, StepError> {
    let mut outcome = DayOutcome::default();

    let Some(rows) = day_rows else {
        // No panel data at all for this day: nothing sellable, nothing buyable.
        return Ok(outcome);
    };

    // ── Sell phase ──
    // Held symbols in ascending order. A holding with no row today is a data
    // gap, not an implicit exit; an unusable close is skipped the same way
    // (the gap is counted when marks are updated).
    for symbol in ledger.held_symbols() {
        let Some(entry) = rows.get(&symbol) else {
            continue;
        };
        if !entry.sell_signal || !entry.has_valid_close() {
            continue;
        }
        let held = match ledger.position(&symbol) {
            Some(position) => position.hold_days(date),
            None => continue,
        };
        if held < config.min_hold_days {
            continue;
        }

        let closed = ledger.close(&symbol, entry.close, date)?;
        outcome.sells.push(Order::sell(
            date,
            closed.symbol.clone(),
            closed.exit_price,
            closed.quantity,
            closed.pnl,
            closed.hold_days,
        ));
        outcome.closed.push(closed);
    }

    // ── Candidate ranking ──
    // Every buy-eligible symbol not held after the sell phase. Always
    // produced in full, even with no free slot or cash, so the daily log
    // records the strategy's intent.
    let mut candidates: Vec<(Symbol, f64)> = rows
        .iter()
        .filter(|(symbol, entry)| entry.buy_signal && !ledger.is_held(symbol))
        .map(|(symbol, entry)| (symbol.clone(), entry.score))
        .collect();
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    outcome.ranked_candidates = candidates;

    // ── Buy phase ──
    let free_slots = config.max_positions.saturating_sub(ledger.count());
    if free_slots == 0 || outcome.ranked_candidates.is_empty() {
        return Ok(outcome);
    }

    let selected: Vec<(Symbol, f64)> = outcome
        .ranked_candidates
        .iter()
        .take(free_slots)
        .cloned()
        .collect();
    let total = selected.len();

    for (index, (symbol, _score)) in selected.iter().enumerate() {
        let entry = match rows.get(symbol) {
            Some(entry) => entry,
            None => continue,
        };
        if !entry.has_valid_close() {
            continue;
        }

        // Equal-weight allocation over the selections still to process, so
        // unspent rounding remainder rolls forward to the next candidate.
        let remaining = (total - index) as f64;
        let allocation = ledger.cash() / remaining;
        let lots = (allocation / entry.close / config.lot_size as f64).floor();
        if lots < 1.0 {
            // Cannot afford one lot: skipped, cash untouched, slot spent.
            continue;
        }
        let quantity = lots as u64 * config.lot_size;
        let cost = entry.close * quantity as f64;
        if cost > ledger.cash() {
            continue;
        }

        ledger.open(symbol, entry.close, quantity, date)?;
        outcome
            .buys
            .push(Order::buy(date, symbol.clone(), entry.close, quantity));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn entry(close: f64, buy: bool, sell: bool, score: f64) -> SignalEntry {
        SignalEntry {
            close,
            buy_signal: buy,
            sell_signal: sell,
            score,
        }
    }

    fn config(max_positions: usize) -> SimulationConfig {
        SimulationConfig {
            initial_capital: 100_000.0,
            max_positions,
            min_hold_days: 1,
            lot_size: 100,
        }
    }

    #[test]
    fn no_panel_data_means_no_activity() {
        let config = config(2);
        let mut ledger = PositionLedger::new(config.initial_capital, 100, 1);
        let outcome = evaluate_day(&mut ledger, &config, d(2), None).unwrap();
        assert!(outcome.buys.is_empty());
        assert!(outcome.sells.is_empty());
        assert!(outcome.ranked_candidates.is_empty());
    }

    #[test]
    fn buys_top_candidates_by_score_with_symbol_tiebreak() {
        let config = config(2);
        let mut ledger = PositionLedger::new(config.initial_capital, 100, 1);
        let mut rows = BTreeMap::new();
        rows.insert("600000.SH".to_string(), entry(10.0, true, false, 1.0));
        rows.insert("000002.SZ".to_string(), entry(20.0, true, false, 2.0));
        rows.insert("000001.SZ".to_string(), entry(30.0, true, false, 2.0));

        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();

        // Tie at score 2.0 breaks symbol-ascending; ranking is always full.
        let ranked: Vec<&str> = outcome
            .ranked_candidates
            .iter()
            .map(|(s, _)| s.as_str())
            .collect();
        assert_eq!(ranked, vec!["000001.SZ", "000002.SZ", "600000.SH"]);

        // Only the top free_slots are bought.
        let bought: Vec<&str> = outcome.buys.iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(bought, vec!["000001.SZ", "000002.SZ"]);
        assert_eq!(ledger.count(), 2);
    }

    #[test]
    fn equal_weight_allocation_rolls_remainder_forward() {
        let config = config(2);
        let mut ledger = PositionLedger::new(100_000.0, 100, 1);
        let mut rows = BTreeMap::new();
        rows.insert("000001.SZ".to_string(), entry(30.0, true, false, 2.0));
        rows.insert("000002.SZ".to_string(), entry(20.0, true, false, 1.0));

        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();

        // First buy: 50_000 / 30 → 16 lots = 1600 shares, 48_000 spent.
        assert_eq!(outcome.buys[0].quantity, 1_600);
        // Second buy sees the full 52_000 remainder: 52_000 / 20 → 26 lots.
        assert_eq!(outcome.buys[1].quantity, 2_600);
        assert_eq!(ledger.cash(), 100_000.0 - 48_000.0 - 52_000.0);
    }

    #[test]
    fn unaffordable_lot_skipped_without_cash_change() {
        let mut config = config(2);
        config.initial_capital = 1_500.0;
        let mut ledger = PositionLedger::new(1_500.0, 100, 1);
        let mut rows = BTreeMap::new();
        // Top-ranked candidate needs 2_000 for one lot; second needs 500.
        rows.insert("000001.SZ".to_string(), entry(20.0, true, false, 5.0));
        rows.insert("000002.SZ".to_string(), entry(5.0, true, false, 1.0));

        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();

        // The expensive candidate is skipped (allocation 750 < one lot), and
        // its unspent allocation rolls to the cheaper one.
        let bought: Vec<&str> = outcome.buys.iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(bought, vec!["000002.SZ"]);
        assert_eq!(outcome.buys[0].quantity, 300); // floor(1500/5/100) lots
        assert_eq!(ledger.cash(), 0.0);
    }

    #[test]
    fn held_symbol_excluded_from_candidates() {
        let config = config(2);
        let mut ledger = PositionLedger::new(100_000.0, 100, 1);
        ledger.open("000001.SZ", 10.0, 100, d(1)).unwrap();
        let mut rows = BTreeMap::new();
        rows.insert("000001.SZ".to_string(), entry(10.0, true, false, 9.0));
        rows.insert("000002.SZ".to_string(), entry(10.0, true, false, 1.0));

        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();
        let ranked: Vec<&str> = outcome
            .ranked_candidates
            .iter()
            .map(|(s, _)| s.as_str())
            .collect();
        assert_eq!(ranked, vec!["000002.SZ"]);
    }

    #[test]
    fn sell_blocked_by_hold_period() {
        let config = config(2);
        let mut ledger = PositionLedger::new(100_000.0, 100, 1);
        ledger.open("000001.SZ", 10.0, 500, d(2)).unwrap();
        let mut rows = BTreeMap::new();
        rows.insert("000001.SZ".to_string(), entry(11.0, false, true, 0.0));

        // Same day: sell signal present but T+1 blocks it.
        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();
        assert!(outcome.sells.is_empty());
        assert!(ledger.is_held("000001.SZ"));

        // Next day the exit goes through.
        let outcome = evaluate_day(&mut ledger, &config, d(3), Some(&rows)).unwrap();
        assert_eq!(outcome.sells.len(), 1);
        assert_eq!(outcome.sells[0].side, Side::Sell);
        assert_eq!(outcome.sells[0].pnl, Some(500.0));
        assert!(!ledger.is_held("000001.SZ"));
    }

    #[test]
    fn missing_row_is_a_gap_not_an_exit() {
        let config = config(2);
        let mut ledger = PositionLedger::new(100_000.0, 100, 1);
        ledger.open("000001.SZ", 10.0, 500, d(1)).unwrap();
        let rows = BTreeMap::new();
        let outcome = evaluate_day(&mut ledger, &config, d(3), Some(&rows)).unwrap();
        assert!(outcome.sells.is_empty());
        assert!(ledger.is_held("000001.SZ"));
    }

    #[test]
    fn invalid_close_blocks_sell() {
        let config = config(2);
        let mut ledger = PositionLedger::new(100_000.0, 100, 1);
        ledger.open("000001.SZ", 10.0, 500, d(1)).unwrap();
        let mut rows = BTreeMap::new();
        rows.insert("000001.SZ".to_string(), entry(f64::NAN, false, true, 0.0));
        let outcome = evaluate_day(&mut ledger, &config, d(3), Some(&rows)).unwrap();
        assert!(outcome.sells.is_empty());
        assert!(ledger.is_held("000001.SZ"));
    }

    #[test]
    fn sells_free_slots_and_cash_for_same_day_buys() {
        let config = config(1);
        let mut ledger = PositionLedger::new(10_000.0, 100, 1);
        ledger.open("000001.SZ", 10.0, 900, d(1)).unwrap();
        assert_eq!(ledger.cash(), 1_000.0);

        let mut rows = BTreeMap::new();
        rows.insert("000001.SZ".to_string(), entry(11.0, false, true, 0.0));
        rows.insert("000002.SZ".to_string(), entry(10.0, true, false, 1.0));

        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();
        assert_eq!(outcome.sells.len(), 1);
        // Exit proceeds (9_900) plus leftover cash fund the new entry.
        assert_eq!(outcome.buys.len(), 1);
        assert_eq!(outcome.buys[0].quantity, 1_000);
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn no_buys_when_no_free_slots_but_ranking_still_logged() {
        let config = config(1);
        let mut ledger = PositionLedger::new(100_000.0, 100, 1);
        ledger.open("000001.SZ", 10.0, 100, d(1)).unwrap();
        let mut rows = BTreeMap::new();
        rows.insert("000002.SZ".to_string(), entry(10.0, true, false, 3.0));

        let outcome = evaluate_day(&mut ledger, &config, d(2), Some(&rows)).unwrap();
        assert!(outcome.buys.is_empty());
        assert_eq!(outcome.ranked_candidates.len(), 1);
    }
}
