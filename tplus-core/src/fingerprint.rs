//! Run fingerprinting — deterministic identification of simulation runs.
//!
//! Two runs with identical panel, trading days, and configuration share a
//! run id. This is the concrete handle for reproducibility checks and for
//! deduplicating sweep results.

use crate::domain::SignalPanel;
use crate::engine::SimulationConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Content hash of a signal panel over its canonically-ordered rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelHash(pub String);

impl PanelHash {
    pub fn of(panel: &SignalPanel) -> Self {
        let mut hasher = blake3::Hasher::new();
        for row in panel.rows() {
            hasher.update(row.date.to_string().as_bytes());
            hasher.update(row.symbol.as_bytes());
            hasher.update(&row.close.to_bits().to_le_bytes());
            hasher.update(&[row.buy_signal as u8, row.sell_signal as u8]);
            hasher.update(&row.score.to_bits().to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }
}

/// Unique identifier for a simulation run (content-addressable hash).
pub type RunId = String;

/// Complete record of one run's identity: what was simulated, over which
/// span, under which configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub run_id: RunId,
    pub panel_hash: PanelHash,
    pub config: SimulationConfig,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

impl RunFingerprint {
    pub fn compute(
        panel: &SignalPanel,
        trading_days: &[NaiveDate],
        config: &SimulationConfig,
    ) -> Self {
        let panel_hash = PanelHash::of(panel);

        let mut hasher = blake3::Hasher::new();
        hasher.update(panel_hash.0.as_bytes());
        // serde_json field order is the struct declaration order, so this
        // serialization is deterministic.
        let config_json =
            serde_json::to_string(config).expect("SimulationConfig must serialize");
        hasher.update(config_json.as_bytes());
        for day in trading_days {
            hasher.update(day.to_string().as_bytes());
        }

        Self {
            run_id: hasher.finalize().to_hex().to_string(),
            panel_hash,
            config: config.clone(),
            first_day: trading_days.first().copied(),
            last_day: trading_days.last().copied(),
        }
    }
}
