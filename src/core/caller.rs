//! Caller identity
//!
//! The `{CallerName}` / `{CallerLineNumber}` fields and the script-vs-host
//! file logging decision both depend on who is logging. Resolution is a
//! pluggable collaborator ([`CallerResolver`]); call-site macros bypass it
//! by passing an explicit [`CallerInfo`] built from `module_path!()` and
//! `line!()`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved identity of the code that submitted a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub name: String,
    pub line_number: String,
    /// True for interactive/host context, false for script/module code
    pub is_interactive: bool,
}

impl CallerInfo {
    pub const CONSOLE_NAME: &'static str = "[CONSOLE]";
    pub const CONSOLE_LINE: &'static str = "[NONE]";
    pub const UNKNOWN_NAME: &'static str = "[UNKNOWN CALLER]";
    pub const UNKNOWN_LINE: &'static str = "----";

    /// Script/module caller
    pub fn new(name: impl Into<String>, line_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line_number: line_number.into(),
            is_interactive: false,
        }
    }

    /// Top-level code of a script or program file
    pub fn script(file_name: &str, line_number: impl Into<String>) -> Self {
        Self::new(format!("Script {}", file_name), line_number)
    }

    /// Caller identity captured at a call site by the logging macros
    pub fn from_location(module_path: &str, line: u32) -> Self {
        Self::new(module_path, line.to_string())
    }

    /// Interactive console
    pub fn console() -> Self {
        Self {
            name: Self::CONSOLE_NAME.to_string(),
            line_number: Self::CONSOLE_LINE.to_string(),
            is_interactive: true,
        }
    }

    /// Identity that could not be determined; treated as host context
    pub fn unknown() -> Self {
        Self {
            name: Self::UNKNOWN_NAME.to_string(),
            line_number: Self::UNKNOWN_LINE.to_string(),
            is_interactive: true,
        }
    }
}

/// Collaborator that identifies who is logging
pub trait CallerResolver: Send + Sync {
    /// Identity of the code outside the logging library that is logging now
    fn resolve_caller(&self) -> CallerInfo;

    /// Directory relative log file names resolve against
    fn caller_base_directory(&self) -> PathBuf;
}

fn current_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolves to the running program: `Script <executable>` with an unknown
/// line, relative paths against the working directory
#[derive(Debug, Clone, Default)]
pub struct ProcessCallerResolver;

impl CallerResolver for ProcessCallerResolver {
    fn resolve_caller(&self) -> CallerInfo {
        std::env::current_exe()
            .ok()
            .and_then(|exe| {
                exe.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .map(|name| CallerInfo::script(&name, CallerInfo::UNKNOWN_LINE))
            .unwrap_or_else(CallerInfo::unknown)
    }

    fn caller_base_directory(&self) -> PathBuf {
        current_directory()
    }
}

/// Always resolves to the interactive console
#[derive(Debug, Clone, Default)]
pub struct ConsoleCallerResolver;

impl CallerResolver for ConsoleCallerResolver {
    fn resolve_caller(&self) -> CallerInfo {
        CallerInfo::console()
    }

    fn caller_base_directory(&self) -> PathBuf {
        current_directory()
    }
}

/// Resolves to a caller and directory fixed at construction
#[derive(Debug, Clone)]
pub struct FixedCallerResolver {
    caller: CallerInfo,
    base_directory: PathBuf,
}

impl FixedCallerResolver {
    pub fn new(caller: CallerInfo, base_directory: impl Into<PathBuf>) -> Self {
        Self {
            caller,
            base_directory: base_directory.into(),
        }
    }
}

impl CallerResolver for FixedCallerResolver {
    fn resolve_caller(&self) -> CallerInfo {
        self.caller.clone()
    }

    fn caller_base_directory(&self) -> PathBuf {
        self.base_directory.clone()
    }
}
