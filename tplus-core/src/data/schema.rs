//! Panel file schema contract — the boundary between the upstream panel
//! builder and this engine.
//!
//! Defines the exact column names and dtypes a materialized panel file must
//! carry. How the signal columns were computed (divergence logic, strict vs
//! relaxed combination, and so on) is entirely upstream; only the shape is
//! contractual here.

use polars::prelude::*;

/// Expected schema for panel data.
pub struct PanelSchema;

impl PanelSchema {
    /// The canonical panel schema.
    ///
    /// - `date`: trading day (date-only precision)
    /// - `symbol`: exchange-qualified security code
    /// - `close`: last traded price for the day
    /// - `buy_signal` / `sell_signal`: 0/1 eligibility flags
    /// - `score`: ranking strength among simultaneous buy candidates
    pub fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("date".into(), DataType::Date),
            Field::new("symbol".into(), DataType::String),
            Field::new("close".into(), DataType::Float64),
            Field::new("buy_signal".into(), DataType::Int64),
            Field::new("sell_signal".into(), DataType::Int64),
            Field::new("score".into(), DataType::Float64),
        ])
    }

    /// Validate a DataFrame against the panel schema.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let expected = Self::schema();
        let actual = df.schema();

        for field in expected.iter_fields() {
            let actual_dtype = actual
                .get(field.name())
                .ok_or_else(|| SchemaError::MissingColumn(field.name().to_string()))?;
            if actual_dtype != field.dtype() {
                return Err(SchemaError::TypeMismatch {
                    column: field.name().to_string(),
                    expected: field.dtype().clone(),
                    actual: actual_dtype.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },
}
