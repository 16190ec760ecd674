//! TPlus Runner — orchestration on top of `tplus-core`.
//!
//! This crate builds on the simulation engine to provide:
//! - Summary metrics (total/annualized return, drawdown, Sharpe, win rate)
//! - Benchmark alignment and excess-return comparison
//! - A single-run driver pairing a shared panel with per-run configs
//! - Parallel parameter sweeps over a configuration grid

pub mod benchmark;
pub mod metrics;
pub mod runner;
pub mod sweep;

pub use benchmark::{compare, BenchmarkComparison, BenchmarkSeries};
pub use metrics::{SummaryMetrics, TRADING_DAYS_PER_YEAR};
pub use runner::{RunError, RunReport, Runner};
pub use sweep::{ParamGrid, ParamSweep, SweepResults};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn shared_types_are_send_sync() {
        assert_send::<Runner>();
        assert_sync::<Runner>();
        assert_send::<RunReport>();
        assert_sync::<RunReport>();
        assert_send::<ParamGrid>();
        assert_sync::<ParamGrid>();
    }
}
