//! Error types for the SST atlas pipeline.

use thiserror::Error;

/// Result type alias using AtlasError.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Primary error type for atlas operations.
#[derive(Debug, Error)]
pub enum AtlasError {
    // === Configuration Errors ===
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    // === Report Errors ===
    #[error("Report generation failed: {0}")]
    Report(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a Render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a Report error.
    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }
}

impl From<serde_yaml::Error> for AtlasError {
    fn from(err: serde_yaml::Error) -> Self {
        AtlasError::ConfigParse(format!("YAML error: {}", err))
    }
}
