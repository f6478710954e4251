//! Logging macros for ergonomic log message formatting.
//!
//! These macros format like `println!` and pass the call site
//! (`module_path!()` and `line!()`) as the caller identity, so
//! `{CallerName}` and `{CallerLineNumber}` show where the message came
//! from. Formatting is skipped entirely when the severity is below the
//! configured threshold.
//!
//! # Examples
//!
//! ```
//! use message_logger::prelude::*;
//! use message_logger::information;
//! use std::sync::Arc;
//!
//! let logger = Logger::builder()
//!     .store(Arc::new(ConfigurationStore::new()))
//!     .build();
//!
//! information!(logger, "Server started");
//!
//! let port = 8080;
//! information!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().store(std::sync::Arc::new(ConfigurationStore::new())).build();
/// use message_logger::log;
/// log!(logger, Severity::Information, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.is_enabled(level) {
            $logger.log_from(
                level,
                format!($($arg)+),
                $crate::CallerInfo::from_location(module_path!(), line!()),
            )
        }
    }};
}

/// Log an error-level message.
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().store(std::sync::Arc::new(ConfigurationStore::new())).build();
/// use message_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an information-level message.
#[macro_export]
macro_rules! information {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Information, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log a verbose-level message.
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().store(std::sync::Arc::new(ConfigurationStore::new())).build();
/// use message_logger::verbose;
/// verbose!(logger, "Entering function: calculate()");
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Verbose, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{ConfigPatch, ConfigurationStore, Logger, Severity};
    use crate::sinks::MemorySink;
    use std::sync::Arc;

    fn logger_with(memory: &MemorySink) -> Logger {
        let logger = Logger::builder()
            .store(Arc::new(ConfigurationStore::new()))
            .sink(memory.clone())
            .build();
        logger
            .patch_configuration(
                &ConfigPatch::new()
                    .log_level(Severity::Verbose)
                    .message_format("{CallerName}:{MessageLevel}:{Message}"),
            )
            .unwrap();
        logger
    }

    #[test]
    fn test_log_macro_formats() {
        let memory = MemorySink::new();
        let logger = logger_with(&memory);
        log!(logger, Severity::Information, "Formatted: {}", 42);
        assert_eq!(
            memory.lines(),
            vec![format!("{}:INFORMATION:Formatted: 42", module_path!())]
        );
    }

    #[test]
    fn test_level_macros() {
        let memory = MemorySink::new();
        let logger = logger_with(&memory);
        error!(logger, "e");
        warning!(logger, "w {}", 1);
        information!(logger, "i");
        debug!(logger, "d");
        verbose!(logger, "v");

        let levels: Vec<_> = memory.decisions().iter().map(|d| d.stream_kind).collect();
        assert_eq!(levels, Severity::MESSAGE_LEVELS.to_vec());
    }

    #[test]
    fn test_suppressed_macro_skips_formatting() {
        let memory = MemorySink::new();
        let logger = logger_with(&memory);
        logger
            .patch_configuration(&ConfigPatch::new().log_level(Severity::Error))
            .unwrap();

        let mut formatted = false;
        debug!(logger, "{}", {
            formatted = true;
            "x"
        });
        assert!(!formatted);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_macro_captures_line() {
        let memory = MemorySink::new();
        let logger = logger_with(&memory);
        logger
            .patch_configuration(&ConfigPatch::new().message_format("{CallerLineNumber}"))
            .unwrap();
        let line = line!() + 1;
        information!(logger, "here");
        assert_eq!(memory.lines(), vec![line.to_string()]);
    }
}
