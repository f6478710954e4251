//! Field-level configuration updates
//!
//! A [`ConfigPatch`] names only the settings it changes. Boolean settings
//! come as pairs of switches (`include_date_in_file_name` /
//! `exclude_date_from_file_name`, ...); setting both halves of a pair is
//! rejected by [`ConfigPatch::validate`] before anything is applied.
//!
//! # Example
//!
//! ```
//! use message_logger::{ConfigPatch, Severity};
//!
//! let patch = ConfigPatch::new()
//!     .log_level(Severity::Debug)
//!     .log_file_name("deploy.log")
//!     .exclude_date_from_file_name()
//!     .append_to_log_file();
//! assert!(patch.validate().is_ok());
//! ```

use super::category::{CategoryInfo, CategoryTable};
use super::color::Color;
use super::config::{validate_host_colors, HostColorTable, LoggerConfiguration};
use super::error::{LoggerError, Result};
use super::severity::Severity;

/// A pair of mutually exclusive switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Switch {
    on: bool,
    off: bool,
}

impl Switch {
    fn resolve(self, on_name: &'static str, off_name: &'static str) -> Result<Option<bool>> {
        match (self.on, self.off) {
            (true, true) => Err(LoggerError::conflicting(on_name, off_name)),
            (true, false) => Ok(Some(true)),
            (false, true) => Ok(Some(false)),
            (false, false) => Ok(None),
        }
    }
}

/// Changes that touched the file target, reported back to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PatchEffects {
    pub template_changed: bool,
    pub file_path_changed: bool,
}

/// Set of optional configuration updates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    log_level: Option<Severity>,
    message_format: Option<String>,
    log_file_name: Option<String>,
    date_in_file_name: Switch,
    overwrite_log_file: Switch,
    write_to_host: Switch,
    file_logging_from_script: Switch,
    file_logging_from_host: Switch,
    host_text_colors: Option<HostColorTable>,
    text_colors: Vec<(Severity, Color)>,
    category_info: Option<CategoryTable>,
    set_category_items: Vec<(String, CategoryInfo)>,
    remove_category_items: Vec<String>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_level(mut self, level: Severity) -> Self {
        self.log_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_format(mut self, template: impl Into<String>) -> Self {
        self.message_format = Some(template.into());
        self
    }

    /// Blank disables file logging
    #[must_use = "builder methods return a new value"]
    pub fn log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn include_date_in_file_name(mut self) -> Self {
        self.date_in_file_name.on = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exclude_date_from_file_name(mut self) -> Self {
        self.date_in_file_name.off = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overwrite_log_file(mut self) -> Self {
        self.overwrite_log_file.on = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn append_to_log_file(mut self) -> Self {
        self.overwrite_log_file.off = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn write_to_host(mut self) -> Self {
        self.write_to_host.on = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn write_to_streams(mut self) -> Self {
        self.write_to_host.off = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_file_logging_from_script(mut self) -> Self {
        self.file_logging_from_script.on = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_file_logging_from_script(mut self) -> Self {
        self.file_logging_from_script.off = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enable_file_logging_from_host(mut self) -> Self {
        self.file_logging_from_host.on = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_file_logging_from_host(mut self) -> Self {
        self.file_logging_from_host.off = true;
        self
    }

    /// Replace the whole severity color table
    #[must_use = "builder methods return a new value"]
    pub fn host_text_colors(mut self, colors: HostColorTable) -> Self {
        self.host_text_colors = Some(colors);
        self
    }

    /// Set the host color of one severity, applied after `host_text_colors`
    #[must_use = "builder methods return a new value"]
    pub fn text_color(mut self, severity: Severity, color: Color) -> Self {
        self.text_colors.push((severity, color));
        self
    }

    /// Replace the whole category table
    #[must_use = "builder methods return a new value"]
    pub fn category_info(mut self, table: CategoryTable) -> Self {
        self.category_info = Some(table);
        self
    }

    /// Upsert one category, applied after `category_info`
    #[must_use = "builder methods return a new value"]
    pub fn set_category_item(mut self, name: impl Into<String>, info: CategoryInfo) -> Self {
        self.set_category_items.push((name.into(), info));
        self
    }

    /// Remove one category if present, applied after upserts
    #[must_use = "builder methods return a new value"]
    pub fn remove_category_item(mut self, name: impl Into<String>) -> Self {
        self.remove_category_items.push(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject conflicting switches and malformed arguments
    pub fn validate(&self) -> Result<()> {
        self.date_in_file_name
            .resolve("IncludeDateInFileName", "ExcludeDateFromFileName")?;
        self.overwrite_log_file
            .resolve("OverwriteLogFile", "AppendToLogFile")?;
        self.write_to_host.resolve("WriteToHost", "WriteToStreams")?;
        self.file_logging_from_script
            .resolve("EnableFileLoggingFromScript", "DisableFileLoggingFromScript")?;
        self.file_logging_from_host
            .resolve("EnableFileLoggingFromHost", "DisableFileLoggingFromHost")?;

        if let Some(ref colors) = self.host_text_colors {
            validate_host_colors(colors)?;
        }
        if self.text_colors.iter().any(|(s, _)| *s == Severity::Off) {
            return Err(LoggerError::config(
                "HostTextColor",
                "Off is not a message severity and cannot have a color",
            ));
        }
        if let Some(ref table) = self.category_info {
            table.validate()?;
        }
        for (name, _) in &self.set_category_items {
            if name.trim().is_empty() {
                return Err(LoggerError::invalid_category(
                    name.as_str(),
                    "category name must not be blank",
                ));
            }
        }
        Ok(())
    }

    /// Apply to a configuration. Validates first; on error `config` is untouched.
    pub(crate) fn apply_to(&self, config: &mut LoggerConfiguration) -> Result<PatchEffects> {
        self.validate()?;

        let include_date = self
            .date_in_file_name
            .resolve("IncludeDateInFileName", "ExcludeDateFromFileName")?;
        let overwrite = self
            .overwrite_log_file
            .resolve("OverwriteLogFile", "AppendToLogFile")?;
        let write_to_host = self.write_to_host.resolve("WriteToHost", "WriteToStreams")?;
        let from_script = self
            .file_logging_from_script
            .resolve("EnableFileLoggingFromScript", "DisableFileLoggingFromScript")?;
        let from_host = self
            .file_logging_from_host
            .resolve("EnableFileLoggingFromHost", "DisableFileLoggingFromHost")?;

        // Category edits can still fail; stage them before touching `config`
        let mut categories = self
            .category_info
            .clone()
            .unwrap_or_else(|| config.categories.clone());
        for (name, info) in &self.set_category_items {
            categories.set_item(name.as_str(), *info)?;
        }
        for name in &self.remove_category_items {
            categories.remove_item(name);
        }

        let mut effects = PatchEffects::default();

        if let Some(level) = self.log_level {
            config.threshold = level;
        }
        if let Some(ref template) = self.message_format {
            effects.template_changed = *template != config.template;
            config.template = template.clone();
        }
        if let Some(ref name) = self.log_file_name {
            effects.file_path_changed |= *name != config.file.name;
            config.file.name = name.clone();
        }
        if let Some(include) = include_date {
            effects.file_path_changed |= include != config.file.include_date_in_name;
            config.file.include_date_in_name = include;
        }
        if let Some(overwrite) = overwrite {
            config.file.overwrite = overwrite;
        }
        if let Some(host) = write_to_host {
            config.write_to_host_default = host;
        }
        if let Some(enabled) = from_script {
            config.file.write_from_script_default = enabled;
        }
        if let Some(enabled) = from_host {
            config.file.write_from_host_default = enabled;
        }
        if let Some(ref colors) = self.host_text_colors {
            config.host_colors = colors.clone();
        }
        for (severity, color) in &self.text_colors {
            config.host_colors.insert(*severity, *color);
        }
        config.categories = categories;

        Ok(effects)
    }
}
