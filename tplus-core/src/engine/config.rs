//! Simulation configuration — explicit fields, validated once at run start.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum tradable share increment for China A-shares.
pub const DEFAULT_LOT_SIZE: u64 = 100;

/// Configuration for a single simulation run.
///
/// Every knob the engine honors is an explicit field here; there is no
/// free-form option map. Validation happens once, before any state is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// Maximum concurrent holdings.
    pub max_positions: usize,
    /// Minimum calendar days between entry and exit (1 = T+1, 0 disables).
    pub min_hold_days: i64,
    pub lot_size: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 600_000.0,
            max_positions: 10,
            min_hold_days: 1,
            lot_size: DEFAULT_LOT_SIZE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("initial_capital must be a positive number, got {0}")]
    NonPositiveCapital(f64),

    #[error("max_positions must be at least 1")]
    ZeroMaxPositions,

    #[error("min_hold_days must be non-negative, got {0}")]
    NegativeMinHold(i64),

    #[error("lot_size must be at least 1")]
    ZeroLotSize,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital(self.initial_capital));
        }
        if self.max_positions == 0 {
            return Err(ConfigError::ZeroMaxPositions);
        }
        if self.min_hold_days < 0 {
            return Err(ConfigError::NegativeMinHold(self.min_hold_days));
        }
        if self.lot_size == 0 {
            return Err(ConfigError::ZeroLotSize);
        }
        Ok(())
    }
}
