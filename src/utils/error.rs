use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read '{path}': {message}")]
    IngestionError { path: String, message: String },

    #[error("Failed to write '{path}': {source}")]
    SerializationError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Input error: {message}")]
    InputError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Ingestion,
    Serialization,
    Input,
    Configuration,
}

impl RegistrationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IngestionError { .. } => ErrorCategory::Ingestion,
            Self::SerializationError { .. } => ErrorCategory::Serialization,
            Self::IoError(_) | Self::InputError { .. } => ErrorCategory::Input,
            Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Short message suitable for the interactive console.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IngestionError { message, .. } => message.clone(),
            Self::SerializationError { source, .. } => source.to_string(),
            Self::IoError(e) => e.to_string(),
            Self::InputError { message } => message.clone(),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("{}: {}", field, reason)
            }
        }
    }

    pub fn input_closed() -> Self {
        Self::InputError {
            message: "input stream closed".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
