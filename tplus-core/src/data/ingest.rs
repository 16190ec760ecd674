//! Panel loaders — materialized CSV/Parquet panel files into a `SignalPanel`.
//!
//! Acquisition of raw market data and computation of the signal columns
//! happen upstream; these loaders only consume already-built panel files.

use crate::data::schema::PanelSchema;
use crate::domain::{SignalPanel, SignalPanelRow};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Ingest failed: {0}")]
    IngestFailed(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Loader for materialized panel files.
pub struct PanelLoader;

impl PanelLoader {
    /// Load a CSV panel file.
    pub fn load_csv(path: &Path) -> Result<SignalPanel, DataError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_schema(Some(Arc::new(PanelSchema::schema())))
            .finish()
            .map_err(|e| DataError::IngestFailed(e.to_string()))?
            .collect()
            .map_err(|e| DataError::IngestFailed(e.to_string()))?;
        Self::from_dataframe(&df)
    }

    /// Load a Parquet panel file.
    pub fn load_parquet(path: &Path) -> Result<SignalPanel, DataError> {
        let file =
            fs::File::open(path).map_err(|e| DataError::IngestFailed(format!("open: {e}")))?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| DataError::IngestFailed(e.to_string()))?;
        Self::from_dataframe(&df)
    }

    /// Convert a schema-conformant DataFrame into a `SignalPanel`.
    ///
    /// Null closes and scores become NaN (a runtime data gap, not a load
    /// failure); null signal flags read as 0. Null dates or symbols are
    /// malformed rows and fail the load.
    pub fn from_dataframe(df: &DataFrame) -> Result<SignalPanel, DataError> {
        PanelSchema::validate(df).map_err(|e| DataError::ValidationFailed(e.to_string()))?;

        let col_err = |e: PolarsError| DataError::IngestFailed(format!("column read: {e}"));
        let date_ca = df.column("date").map_err(col_err)?.date().map_err(col_err)?;
        let symbol_ca = df.column("symbol").map_err(col_err)?.str().map_err(col_err)?;
        let close_ca = df.column("close").map_err(col_err)?.f64().map_err(col_err)?;
        let buy_ca = df
            .column("buy_signal")
            .map_err(col_err)?
            .i64()
            .map_err(col_err)?;
        let sell_ca = df
            .column("sell_signal")
            .map_err(col_err)?
            .i64()
            .map_err(col_err)?;
        let score_ca = df.column("score").map_err(col_err)?.f64().map_err(col_err)?;

        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let mut rows = Vec::with_capacity(df.height());

        for i in 0..df.height() {
            let date_days = date_ca
                .get(i)
                .ok_or_else(|| DataError::ValidationFailed(format!("null date at row {i}")))?;
            let symbol = symbol_ca
                .get(i)
                .ok_or_else(|| DataError::ValidationFailed(format!("null symbol at row {i}")))?;

            rows.push(SignalPanelRow {
                date: epoch + chrono::Duration::days(date_days as i64),
                symbol: symbol.to_string(),
                close: close_ca.get(i).unwrap_or(f64::NAN),
                buy_signal: buy_ca.get(i).unwrap_or(0) != 0,
                sell_signal: sell_ca.get(i).unwrap_or(0) != 0,
                score: score_ca.get(i).unwrap_or(f64::NAN),
            });
        }

        SignalPanel::from_rows(rows).map_err(|e| DataError::ValidationFailed(e.to_string()))
    }
}
