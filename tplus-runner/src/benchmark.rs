//! Benchmark comparison — align an index close series to the strategy
//! calendar and measure excess return.
//!
//! Consumed only by the metrics layer; the simulation loop itself never
//! sees benchmark data. Fetching the series is an upstream concern — this
//! module receives already-materialized closes.

use crate::metrics::{annualized_return, max_drawdown, total_return};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An independent close-price series for a benchmark index.
#[derive(Debug, Clone)]
pub struct BenchmarkSeries {
    pub name: String,
    closes: BTreeMap<NaiveDate, f64>,
}

impl BenchmarkSeries {
    pub fn new(name: impl Into<String>, closes: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.into(),
            closes: closes.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Reindex the series onto the strategy's trading days: forward-fill
    /// from the last known close, back-fill the leading edge. `None` when
    /// the series has no data at all.
    pub fn align_to_days(&self, days: &[NaiveDate]) -> Option<Vec<f64>> {
        if self.closes.is_empty() || days.is_empty() {
            return None;
        }

        let mut aligned: Vec<Option<f64>> = days
            .iter()
            .map(|day| {
                self.closes
                    .range(..=day)
                    .next_back()
                    .map(|(_, close)| *close)
            })
            .collect();

        // Back-fill days before the series starts with its first close.
        let first_known = *self.closes.values().next()?;
        for slot in aligned.iter_mut() {
            if slot.is_none() {
                *slot = Some(first_known);
            } else {
                break;
            }
        }

        aligned.into_iter().collect()
    }

    /// The benchmark as an equity curve: daily returns of the aligned
    /// closes compounded from `initial_capital`.
    pub fn equity_curve(&self, days: &[NaiveDate], initial_capital: f64) -> Option<Vec<f64>> {
        let aligned = self.align_to_days(days)?;
        let mut curve = Vec::with_capacity(aligned.len());
        let mut equity = initial_capital;
        curve.push(equity);
        for w in aligned.windows(2) {
            let ret = if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 };
            equity *= 1.0 + ret;
            curve.push(equity);
        }
        Some(curve)
    }
}

/// Benchmark summary relative to a strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub name: String,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    /// Strategy total return minus benchmark total return.
    pub excess_return_vs_strategy: f64,
}

/// Compare one benchmark against a strategy's total return over the same
/// trading days. `None` when the series cannot be aligned.
pub fn compare(
    series: &BenchmarkSeries,
    days: &[NaiveDate],
    initial_capital: f64,
    strategy_total_return: f64,
) -> Option<BenchmarkComparison> {
    let curve = series.equity_curve(days, initial_capital)?;
    let bench_total = total_return(&curve);
    Some(BenchmarkComparison {
        name: series.name.clone(),
        total_return: bench_total,
        annualized_return: annualized_return(&curve),
        max_drawdown: max_drawdown(&curve),
        excess_return_vs_strategy: strategy_total_return - bench_total,
    })
}
