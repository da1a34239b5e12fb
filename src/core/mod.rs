pub mod csv_export;
pub mod display;
pub mod entry;
pub mod session;

pub use crate::domain::model::{Record, RecordSet, SessionState};
pub use crate::domain::ports::{ConfigProvider, SpreadsheetReader, Storage};
pub use crate::utils::error::Result;
