//! Parameter sweep — run a configuration grid in parallel.
//!
//! Each simulation owns its own ledger; the panel is the only shared input
//! and is read-only, so the grid fans out safely across threads.

use crate::runner::{RunError, RunReport, Runner};
use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tplus_core::engine::{SimulationConfig, DEFAULT_LOT_SIZE};
use tplus_core::fingerprint::RunId;

/// Parameter grid specification, loadable from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    /// Concurrent-holding caps to test.
    pub max_positions: Vec<usize>,

    /// Hold-period rules to test (1 = T+1, 0 = same-day exits allowed).
    pub min_hold_days: Vec<i64>,

    /// Initial capital values to test.
    pub initial_capitals: Vec<f64>,

    #[serde(default = "default_lot_size")]
    pub lot_size: u64,
}

fn default_lot_size() -> u64 {
    DEFAULT_LOT_SIZE
}

impl ParamGrid {
    /// A-shares default grid: vary the holding cap, keep T+1 fixed.
    pub fn ashares_default() -> Self {
        Self {
            max_positions: vec![5, 10, 20],
            min_hold_days: vec![1],
            initial_capitals: vec![600_000.0],
            lot_size: DEFAULT_LOT_SIZE,
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading sweep grid {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("parsing sweep grid {}", path.display()))
    }

    /// Total number of configurations in this grid.
    pub fn size(&self) -> usize {
        self.max_positions.len() * self.min_hold_days.len() * self.initial_capitals.len()
    }

    /// Generate every configuration in the grid, in a fixed order.
    pub fn generate_configs(&self) -> Vec<SimulationConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &max_positions in &self.max_positions {
            for &min_hold_days in &self.min_hold_days {
                for &initial_capital in &self.initial_capitals {
                    configs.push(SimulationConfig {
                        initial_capital,
                        max_positions,
                        min_hold_days,
                        lot_size: self.lot_size,
                    });
                }
            }
        }
        configs
    }
}

/// Sweep executor: runs every configuration in a grid, optionally in
/// parallel.
pub struct ParamSweep {
    runner: Runner,
    parallel: bool,
}

impl ParamSweep {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Execute the sweep over the given grid.
    pub fn sweep(&self, grid: &ParamGrid) -> Result<SweepResults, RunError> {
        let configs = grid.generate_configs();

        let results: Vec<RunReport> = if self.parallel {
            configs
                .par_iter()
                .map(|config| self.runner.run(config))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            configs
                .iter()
                .map(|config| self.runner.run(config))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResults::new(results))
    }
}

/// Results from a parameter sweep.
#[derive(Debug)]
pub struct SweepResults {
    results: Vec<RunReport>,
    by_run_id: HashMap<RunId, usize>,
}

impl SweepResults {
    fn new(results: Vec<RunReport>) -> Self {
        let by_run_id = results
            .iter()
            .enumerate()
            .map(|(index, report)| (report.run_id.clone(), index))
            .collect();
        Self { results, by_run_id }
    }

    pub fn all(&self) -> &[RunReport] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&RunReport> {
        self.by_run_id.get(run_id).map(|&index| &self.results[index])
    }

    /// Reports sorted by total return, best first. Ties keep grid order.
    pub fn sorted_by_total_return(&self) -> Vec<&RunReport> {
        let mut sorted: Vec<&RunReport> = self.results.iter().collect();
        sorted.sort_by(|a, b| {
            b.metrics
                .total_return
                .partial_cmp(&a.metrics.total_return)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn top_n(&self, n: usize) -> Vec<&RunReport> {
        self.sorted_by_total_return().into_iter().take(n).collect()
    }

    pub fn best(&self) -> Option<&RunReport> {
        self.sorted_by_total_return().into_iter().next()
    }
}
