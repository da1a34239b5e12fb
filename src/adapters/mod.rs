// Adapters layer: concrete implementations for the filesystem, spreadsheets and the terminal.

pub mod console;
pub mod excel;
pub mod storage;

pub use console::Console;
pub use excel::ExcelReader;
pub use storage::LocalStorage;
