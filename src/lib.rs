//! # Message Logger
//!
//! A configurable message-logging library: callers submit a message with
//! optional severity and category, and the logger renders it through a
//! format template and routes it to the host console, severity streams
//! and/or a log file according to a process-wide configuration.
//!
//! ## Features
//!
//! - **Templates**: `{Timestamp:HH:mm:ss} [{MessageLevel}] {Message}` compiled once
//! - **Thresholds**: suppressed messages cost one comparison
//! - **Layered routing**: per-call options over configuration over defaults
//! - **Overwrite-once log files**: the first write after a path change truncates
//!
//! ```
//! use message_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = MemorySink::new();
//! let logger = Logger::builder()
//!     .store(Arc::new(ConfigurationStore::new()))
//!     .sink(memory.clone())
//!     .build();
//!
//! logger
//!     .patch_configuration(&ConfigPatch::new().message_format("{MessageLevel} | {Message}"))
//!     .unwrap();
//! logger.error("disk full");
//! logger.debug("not shown");
//!
//! assert_eq!(memory.lines(), vec!["ERROR | disk full".to_string()]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::MemorySink;
    pub use crate::core::{
        CallerInfo, CallerResolver, CategoryInfo, CategoryTable, Clock, Color, ConfigPatch,
        ConfigurationStore, Destination, FixedCallerResolver, FixedClock, Logger, LoggerBuilder,
        LoggerConfiguration, LoggerError, LoggerMetrics, MessageRouter, Result, RoutingDecision,
        Severity, Sink, SubmitOptions, SubmitOutcome, SystemClock,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::FileSink;
pub use sinks::MemorySink;
pub use core::{
    CallerInfo, CallerResolver, CategoryInfo, CategoryTable, Clock, Color, CompiledTemplate,
    ConfigPatch, ConfigurationStore, DateFormat, Destination, Field, FileTarget, FileWrite,
    FileWriteMode, FileWriteState, FixedCallerResolver, FixedClock, Logger, LoggerBuilder,
    LoggerConfiguration, LoggerError, LoggerMetrics, MessageRouter, ProcessCallerResolver, Result,
    RoutingDecision, Severity, Sink, SubmitOptions, SubmitOutcome, SystemClock,
};
