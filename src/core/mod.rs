//! Core logger types and traits

pub mod caller;
pub mod category;
pub mod color;
pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod patch;
pub mod router;
pub mod severity;
pub mod sink;
pub mod store;
pub mod template;
pub mod timestamp;

pub use caller::{
    CallerInfo, CallerResolver, ConsoleCallerResolver, FixedCallerResolver, ProcessCallerResolver,
};
pub use category::{CategoryInfo, CategoryTable};
pub use color::Color;
pub use config::{
    FileTarget, HostColorTable, LoggerConfiguration, DEFAULT_LOG_FILE_NAME, DEFAULT_MESSAGE_FORMAT,
};
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use patch::ConfigPatch;
pub use router::{Destination, MessageRouter, RoutingDecision, SubmitOptions, SubmitOutcome};
pub use severity::Severity;
pub use sink::Sink;
pub use store::{ConfigurationStore, FileWrite, FileWriteMode, FileWriteState};
pub use template::{CompiledTemplate, Field, FieldSet, RenderContext, TemplateCache, Token};
pub use timestamp::{Clock, DateFormat, DatePart, FixedClock, SystemClock, DEFAULT_TIMESTAMP_FORMAT};
