use crate::domain::model::Record;
use crate::utils::error::Result;
use std::path::Path;

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Replaces any existing content at `path`.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

/// Decodes the first worksheet of a spreadsheet into records keyed by the header row.
pub trait SpreadsheetReader {
    fn read_records(&self, path: &Path) -> Result<Vec<Record>>;
}

pub trait ConfigProvider {
    fn output_path(&self) -> &str;
    fn initial_spreadsheet(&self) -> Option<&str>;
}
