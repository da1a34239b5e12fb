use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_writable_file_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "time_entries.csv";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "time-registration")]
#[command(about = "Register working time from an Excel sheet and keep it as CSV")]
pub struct CliConfig {
    /// Spreadsheet to load at start; without it you are asked for one
    #[arg(long)]
    pub excel: Option<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            excel: None,
            output: DEFAULT_OUTPUT_PATH.to_string(),
            verbose: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output
    }

    fn initial_spreadsheet(&self) -> Option<&str> {
        self.excel.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_writable_file_path("output", &self.output)?;
        if let Some(excel) = &self.excel {
            validate_non_empty_string("excel", excel)?;
        }
        Ok(())
    }
}
