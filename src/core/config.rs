//! Logger configuration record
//!
//! [`LoggerConfiguration`] is a plain, strongly-typed value. The live
//! instance is owned by the configuration store; everything else works on
//! copies.

use super::category::{CategoryInfo, CategoryTable};
use super::color::Color;
use super::error::{LoggerError, Result};
use super::severity::Severity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Template applied when none is configured
pub const DEFAULT_MESSAGE_FORMAT: &str =
    "{Timestamp:yyyy-MM-dd HH:mm:ss.fff} | {CallerName} | {Category} | {MessageLevel} | {Message}";

/// Log file name applied when none is configured
pub const DEFAULT_LOG_FILE_NAME: &str = "Logfile.log";

/// Host text color per message severity
pub type HostColorTable = BTreeMap<Severity, Color>;

/// Log file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FileTarget {
    /// Configured file name; blank disables file logging
    pub name: String,
    pub include_date_in_name: bool,
    pub overwrite: bool,
    pub write_from_script_default: bool,
    pub write_from_host_default: bool,
    #[serde(skip)]
    pub(crate) resolved_full_path: PathBuf,
}

impl Default for FileTarget {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOG_FILE_NAME.to_string(),
            include_date_in_name: true,
            overwrite: true,
            write_from_script_default: true,
            write_from_host_default: false,
            resolved_full_path: PathBuf::new(),
        }
    }
}

// The resolved path is derived state and takes no part in equality
impl PartialEq for FileTarget {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.include_date_in_name == other.include_date_in_name
            && self.overwrite == other.overwrite
            && self.write_from_script_default == other.write_from_script_default
            && self.write_from_host_default == other.write_from_host_default
    }
}

impl Eq for FileTarget {}

impl FileTarget {
    /// Path the log file is written to; empty when file logging is disabled.
    ///
    /// Derived from `name` and `include_date_in_name` by the store.
    pub fn resolved_full_path(&self) -> &Path {
        &self.resolved_full_path
    }

    pub fn is_enabled(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Process-wide logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfiguration {
    #[serde(rename = "LogLevel")]
    pub threshold: Severity,
    #[serde(rename = "MessageFormat")]
    pub template: String,
    #[serde(rename = "WriteToHost")]
    pub write_to_host_default: bool,
    #[serde(rename = "HostTextColor")]
    pub host_colors: HostColorTable,
    #[serde(rename = "CategoryInfo")]
    pub categories: CategoryTable,
    #[serde(rename = "LogFile")]
    pub file: FileTarget,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self {
            threshold: Severity::Information,
            template: DEFAULT_MESSAGE_FORMAT.to_string(),
            write_to_host_default: true,
            host_colors: default_host_colors(),
            categories: default_categories(),
            file: FileTarget::default(),
        }
    }
}

pub fn default_host_colors() -> HostColorTable {
    BTreeMap::from([
        (Severity::Error, Color::Red),
        (Severity::Warning, Color::Yellow),
        (Severity::Information, Color::Cyan),
        (Severity::Debug, Color::White),
        (Severity::Verbose, Color::White),
    ])
}

pub fn default_categories() -> CategoryTable {
    let mut table = CategoryTable::new();
    for (name, color) in [
        ("Success", Color::Green),
        ("Failure", Color::Red),
        ("PartialFailure", Color::Yellow),
    ] {
        // Names are non-blank literals
        let _ = table.set_item(name, CategoryInfo::colored(color));
    }
    table
}

pub(crate) fn validate_host_colors(colors: &HostColorTable) -> Result<()> {
    if colors.contains_key(&Severity::Off) {
        return Err(LoggerError::config(
            "HostTextColor",
            "Off is not a message severity and cannot have a color",
        ));
    }
    Ok(())
}

impl LoggerConfiguration {
    /// Check the invariants a replacement configuration must satisfy
    pub fn validate(&self) -> Result<()> {
        validate_host_colors(&self.host_colors)?;
        self.categories.validate()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a configuration; absent keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfiguration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Resolve the log file path for a configured name.
///
/// Blank names yield an empty path. Relative names are joined onto
/// `base_directory`. With `include_date`, `_yyyyMMdd` is spliced between
/// the file stem and its extension.
pub fn resolve_log_path(
    name: &str,
    include_date: bool,
    base_directory: &Path,
    date: NaiveDate,
) -> PathBuf {
    let name = name.trim();
    if name.is_empty() {
        return PathBuf::new();
    }

    let configured = Path::new(name);
    let mut path = if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base_directory.join(configured)
    };

    if include_date {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let dated = format!("{}_{}{}", stem, date.format("%Y%m%d"), extension);
        path.set_file_name(dated);
    }

    path
}
