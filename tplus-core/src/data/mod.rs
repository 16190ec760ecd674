//! Panel data contract, loaders, and the trading calendar seam.

pub mod calendar;
pub mod ingest;
pub mod schema;

pub use calendar::{CalendarError, StaticCalendar, TradingCalendar};
pub use ingest::{DataError, PanelLoader};
pub use schema::{PanelSchema, SchemaError};
