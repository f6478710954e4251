//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Severity name that does not match any known severity
    #[error("Invalid severity '{value}': expected one of Off, Error, Warning, Information, Debug, Verbose")]
    InvalidSeverity { value: String },

    /// Color name that does not match any console color
    #[error("Invalid color '{value}': expected a console color name such as Red, DarkYellow or White")]
    InvalidColor { value: String },

    /// Two mutually exclusive options supplied in the same call
    #[error("Options '{first}' and '{second}' are mutually exclusive and cannot both be set")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },

    /// Category argument with an invalid shape
    #[error("Invalid category '{name}': {message}")]
    InvalidCategory { name: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Sink failure (never surfaced to `Logger` callers)
    #[error("Sink '{sink}' failed: {message}")]
    SinkError { sink: String, message: String },
}

impl LoggerError {
    /// Create an invalid severity error
    pub fn invalid_severity(value: impl Into<String>) -> Self {
        LoggerError::InvalidSeverity {
            value: value.into(),
        }
    }

    /// Create an invalid color error
    pub fn invalid_color(value: impl Into<String>) -> Self {
        LoggerError::InvalidColor {
            value: value.into(),
        }
    }

    /// Create a mutually-exclusive option error
    pub fn conflicting(first: &'static str, second: &'static str) -> Self {
        LoggerError::ConflictingOptions { first, second }
    }

    /// Create an invalid category error
    pub fn invalid_category(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidCategory {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a validation failure raised before any mutation
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidSeverity { .. }
                | LoggerError::InvalidColor { .. }
                | LoggerError::ConflictingOptions { .. }
                | LoggerError::InvalidCategory { .. }
                | LoggerError::InvalidConfiguration { .. }
        )
    }
}
