//! Simulation engine — ledger, daily step evaluator, and the day loop.
//!
//! Data flows one direction: signal panel → daily step → ledger mutation →
//! daily log → simulation result. The loop is strictly sequential; each
//! day's ledger state is the precondition for the next.

pub mod config;
pub mod ledger;
pub mod result;
pub mod simulator;
pub mod step;

pub use config::{ConfigError, SimulationConfig, DEFAULT_LOT_SIZE};
pub use ledger::{ClosedPosition, LedgerError, PositionLedger};
pub use result::{DailySignalCount, SimulationResult};
pub use simulator::{signal_counts, simulate, SimulationError};
pub use step::{evaluate_day, DayOutcome, StepError};
