//! Domain types for the T+1 portfolio simulator.

pub mod log;
pub mod order;
pub mod panel;
pub mod position;
pub mod trade;

pub use log::DailyLog;
pub use order::{Order, Side};
pub use panel::{PanelError, SignalEntry, SignalPanel, SignalPanelRow};
pub use position::Position;
pub use trade::TradeRecord;

/// Symbol type alias
pub type Symbol = String;
