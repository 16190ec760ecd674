//! Single-run driver — simulate + fingerprint + metrics in one call.

use crate::metrics::SummaryMetrics;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tplus_core::domain::SignalPanel;
use tplus_core::engine::{simulate, SimulationConfig, SimulationError, SimulationResult};
use tplus_core::fingerprint::{RunFingerprint, RunId};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Everything a consumer needs from one run: identity, configuration,
/// summary statistics, and the full auditable result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub config: SimulationConfig,
    pub metrics: SummaryMetrics,
    pub result: SimulationResult,
}

/// Owns a shared panel and trading calendar; each `run` call constructs its
/// own ledger, so a single `Runner` can serve many threads at once.
#[derive(Debug, Clone)]
pub struct Runner {
    panel: Arc<SignalPanel>,
    trading_days: Vec<NaiveDate>,
}

impl Runner {
    pub fn new(panel: SignalPanel, trading_days: Vec<NaiveDate>) -> Self {
        Self {
            panel: Arc::new(panel),
            trading_days,
        }
    }

    pub fn trading_days(&self) -> &[NaiveDate] {
        &self.trading_days
    }

    pub fn panel(&self) -> &SignalPanel {
        &self.panel
    }

    /// Run one simulation under `config`.
    pub fn run(&self, config: &SimulationConfig) -> Result<RunReport, RunError> {
        let fingerprint = RunFingerprint::compute(&self.panel, &self.trading_days, config);
        let result = simulate(&self.panel, &self.trading_days, config)?;
        let metrics = SummaryMetrics::compute(&result.equity_values(), &result.trades);

        Ok(RunReport {
            run_id: fingerprint.run_id,
            config: config.clone(),
            metrics,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplus_core::domain::SignalPanelRow;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn runner() -> Runner {
        let panel = SignalPanel::from_rows(vec![
            SignalPanelRow {
                date: d(2),
                symbol: "AAA".into(),
                close: 10.0,
                buy_signal: true,
                sell_signal: false,
                score: 1.0,
            },
            SignalPanelRow {
                date: d(3),
                symbol: "AAA".into(),
                close: 11.0,
                buy_signal: false,
                sell_signal: true,
                score: 0.0,
            },
        ])
        .unwrap();
        Runner::new(panel, vec![d(2), d(3)])
    }

    #[test]
    fn run_produces_metrics_and_identity() {
        let runner = runner();
        let config = SimulationConfig {
            initial_capital: 100_000.0,
            max_positions: 1,
            min_hold_days: 1,
            lot_size: 100,
        };
        let report = runner.run(&config).unwrap();
        assert!(!report.run_id.is_empty());
        assert_eq!(report.result.trades.len(), 1);
        assert!((report.metrics.total_return - 0.1).abs() < 1e-9);
    }

    #[test]
    fn identical_runs_share_a_run_id() {
        let runner = runner();
        let config = SimulationConfig::default();
        let a = runner.run(&config).unwrap();
        let b = runner.run(&config).unwrap();
        assert_eq!(a.run_id, b.run_id);
        assert_eq!(
            serde_json::to_string(&a.result).unwrap(),
            serde_json::to_string(&b.result).unwrap()
        );
    }

    #[test]
    fn invalid_config_surfaces_simulation_error() {
        let runner = runner();
        let mut config = SimulationConfig::default();
        config.max_positions = 0;
        assert!(matches!(
            runner.run(&config).unwrap_err(),
            RunError::Simulation(SimulationError::InvalidParameter(_))
        ));
    }
}
