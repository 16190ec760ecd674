//! TPlus Core — signal-panel portfolio simulation under A-shares constraints.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (panel rows, positions, orders, trades, daily logs)
//! - Position ledger with lot-size and hold-period enforcement
//! - Two-phase daily step evaluator (sells before buys, ranked buys)
//! - Strictly sequential portfolio simulator producing an auditable result
//! - Panel schema contract with CSV/Parquet loaders
//! - Run fingerprinting for reproducibility checks

pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
