pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{Console, ExcelReader, LocalStorage};
pub use config::CliConfig;
pub use core::session::SessionController;
pub use utils::error::{RegistrationError, Result};
