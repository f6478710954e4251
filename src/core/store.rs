//! Configuration store
//!
//! Owns the live [`LoggerConfiguration`] together with the state derived
//! from it: the compiled message template, the resolved log file path and
//! whether that file has been written yet. Reads hand out copies; the only
//! way to change the live record is [`reset`](ConfigurationStore::reset),
//! [`replace`](ConfigurationStore::replace) or
//! [`patch`](ConfigurationStore::patch).
//!
//! All state sits behind one mutex, so a router's read-decide-mark sequence
//! on the file write flag is atomic with respect to configuration changes.

use super::caller::{CallerResolver, ProcessCallerResolver};
use super::config::{resolve_log_path, LoggerConfiguration};
use super::error::{LoggerError, Result};
use super::patch::ConfigPatch;
use super::severity::Severity;
use super::template::CompiledTemplate;
use super::timestamp::{Clock, SystemClock};
use parking_lot::{Mutex, MutexGuard};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Whether the current log file has been written since its path last changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWriteState {
    NotYetWritten,
    Written,
}

/// How a sink must open the log file for one write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWriteMode {
    Overwrite,
    Append,
}

/// A file write granted by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: PathBuf,
    pub mode: FileWriteMode,
}

struct StoreState {
    config: LoggerConfiguration,
    template: Arc<CompiledTemplate>,
    write_state: FileWriteState,
}

pub struct ConfigurationStore {
    state: Mutex<StoreState>,
    /// Held from a file write grant until the write is done
    writes: Mutex<()>,
    caller: Arc<dyn CallerResolver>,
    clock: Arc<dyn Clock>,
}

static GLOBAL_STORE: OnceLock<Arc<ConfigurationStore>> = OnceLock::new();

impl ConfigurationStore {
    /// A store initialized to defaults, resolving relative log paths against
    /// the working directory
    #[must_use]
    pub fn new() -> Self {
        Self::with_collaborators(Arc::new(ProcessCallerResolver), Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_collaborators(caller: Arc<dyn CallerResolver>, clock: Arc<dyn Clock>) -> Self {
        let config = LoggerConfiguration::default();
        let template = Arc::new(CompiledTemplate::compile(&config.template));
        let store = Self {
            state: Mutex::new(StoreState {
                config,
                template,
                write_state: FileWriteState::NotYetWritten,
            }),
            writes: Mutex::new(()),
            caller,
            clock,
        };
        {
            let mut state = store.state.lock();
            store.refresh_path(&mut state, true);
        }
        store
    }

    /// The process-wide store, created with defaults on first use
    pub fn global() -> Arc<ConfigurationStore> {
        Arc::clone(GLOBAL_STORE.get_or_init(|| Arc::new(ConfigurationStore::new())))
    }

    /// Copy of the live configuration
    pub fn get(&self) -> LoggerConfiguration {
        self.state.lock().config.clone()
    }

    /// Restore the hard-coded defaults
    pub fn reset(&self) {
        let mut config = LoggerConfiguration::default();
        let template = Arc::new(CompiledTemplate::compile(&config.template));
        let mut state = self.state.lock();
        let name_changed = state.config.file.name != config.file.name
            || state.config.file.include_date_in_name != config.file.include_date_in_name;
        config.file.resolved_full_path = state.config.file.resolved_full_path.clone();
        state.config = config;
        state.template = template;
        self.refresh_path(&mut state, name_changed);
    }

    /// Replace the whole configuration with a copy of `config`
    pub fn replace(&self, config: &LoggerConfiguration) -> Result<()> {
        config.validate()?;
        let mut config = config.clone();
        config.file.resolved_full_path = PathBuf::new();
        let template = Arc::new(CompiledTemplate::compile(&config.template));

        let mut state = self.state.lock();
        let name_changed = state.config.file.name != config.file.name
            || state.config.file.include_date_in_name != config.file.include_date_in_name;
        // Keep the current path so an unchanged file keeps its write state
        config.file.resolved_full_path = state.config.file.resolved_full_path.clone();
        state.config = config;
        state.template = template;
        self.refresh_path(&mut state, name_changed);
        Ok(())
    }

    /// Apply the options in `patch`; all-or-nothing
    pub fn patch(&self, patch: &ConfigPatch) -> Result<()> {
        patch.validate()?;
        let mut state = self.state.lock();
        let mut staged = state.config.clone();
        let effects = patch.apply_to(&mut staged)?;

        if effects.template_changed {
            state.template = Arc::new(CompiledTemplate::compile(&staged.template));
        }
        state.config = staged;
        if effects.file_path_changed {
            self.refresh_path(&mut state, true);
        }
        Ok(())
    }

    pub fn threshold(&self) -> Severity {
        self.state.lock().config.threshold
    }

    /// Compiled form of the configured template
    pub fn compiled_template(&self) -> Arc<CompiledTemplate> {
        Arc::clone(&self.state.lock().template)
    }

    pub fn resolved_file_path(&self) -> PathBuf {
        self.state.lock().config.file.resolved_full_path.clone()
    }

    pub fn file_write_state(&self) -> FileWriteState {
        self.state.lock().write_state
    }

    /// Run `f` against the live configuration without copying it
    pub(crate) fn read<R>(
        &self,
        f: impl FnOnce(&LoggerConfiguration, &Arc<CompiledTemplate>) -> R,
    ) -> R {
        let state = self.state.lock();
        f(&state.config, &state.template)
    }

    /// Serialize grant-then-write sequences across every logger sharing
    /// this store. Must be taken before any other store lock.
    pub fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock()
    }

    /// Grant one file write: overwrite the first time after a path change
    /// (when overwriting is configured), append afterwards.
    ///
    /// Returns `None` when file logging is disabled. Callers that perform
    /// the write hold [`lock_writes`](Self::lock_writes) until it is done.
    pub fn claim_file_write(&self) -> Option<FileWrite> {
        let mut state = self.state.lock();
        if state.config.file.include_date_in_name {
            // The date may have rolled over since the path was resolved
            self.refresh_path(&mut state, false);
        }

        let path = state.config.file.resolved_full_path.clone();
        if path.as_os_str().is_empty() {
            return None;
        }

        let first_write = state.write_state == FileWriteState::NotYetWritten;
        let mode = if state.config.file.overwrite && first_write {
            FileWriteMode::Overwrite
        } else {
            FileWriteMode::Append
        };
        state.write_state = FileWriteState::Written;
        Some(FileWrite { path, mode })
    }

    /// Recompute the resolved path; a changed path, or a forced reset,
    /// returns the file to `NotYetWritten`
    fn refresh_path(&self, state: &mut StoreState, force_reset: bool) {
        let file = &state.config.file;
        let resolved = if file.is_enabled() {
            resolve_log_path(
                &file.name,
                file.include_date_in_name,
                &self.caller.caller_base_directory(),
                self.clock.now().date_naive(),
            )
        } else {
            PathBuf::new()
        };

        if force_reset || resolved != state.config.file.resolved_full_path {
            state.write_state = FileWriteState::NotYetWritten;
        }
        state.config.file.resolved_full_path = resolved;
    }

    /// Replace the configuration with one read from a JSON file
    pub fn load_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        let config = LoggerConfiguration::from_json(&json)?;
        self.replace(&config)
    }

    /// Write the live configuration to a JSON file
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.get().to_json()?;
        fs::write(path, json).map_err(|e| {
            LoggerError::io_operation(
                "writing configuration",
                format!("Failed to write '{}'", path.display()),
                e,
            )
        })
    }
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::caller::{CallerInfo, FixedCallerResolver};
    use crate::core::category::CategoryInfo;
    use crate::core::color::Color;
    use crate::core::timestamp::FixedClock;
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

    fn store_at(base: &str) -> ConfigurationStore {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date");
        ConfigurationStore::with_collaborators(
            Arc::new(FixedCallerResolver::new(CallerInfo::new("job", "1"), base)),
            Arc::new(FixedClock::from_naive(naive)),
        )
    }

    #[test]
    fn test_get_returns_independent_copy() {
        let store = store_at("/srv");
        let mut copy = store.get();
        copy.threshold = Severity::Verbose;
        copy.categories.remove_item("Success");

        let fresh = store.get();
        assert_eq!(fresh.threshold, Severity::Information);
        assert!(fresh.categories.get("Success").is_some());
    }

    #[test]
    fn test_replace_round_trip() {
        let store = store_at("/srv");
        let mut config = store.get();
        config.threshold = Severity::Warning;
        config.template = "{Message}".to_string();
        config.host_colors.insert(Severity::Debug, Color::Gray);

        store.replace(&config).unwrap();
        assert_eq!(store.get(), config);
        assert_eq!(store.compiled_template().source(), "{Message}");
    }

    #[test]
    fn test_replace_validates() {
        let store = store_at("/srv");
        let mut config = store.get();
        config.threshold = Severity::Verbose;
        config.host_colors.insert(Severity::Off, Color::Red);

        assert!(store.replace(&config).is_err());
        assert_eq!(store.threshold(), Severity::Information);
    }

    #[test]
    fn test_dated_path_resolution() {
        let store = store_at("/srv/app");
        store
            .patch(&ConfigPatch::new().log_file_name("Out.log").include_date_in_file_name())
            .unwrap();
        let path = store.resolved_file_path();
        assert!(path.ends_with("Out_20240101.log"));
        assert!(path.starts_with("/srv/app"));

        store.patch(&ConfigPatch::new().exclude_date_from_file_name()).unwrap();
        assert!(store.resolved_file_path().ends_with("Out.log"));
    }

    #[test]
    fn test_conflicting_patch_is_atomic() {
        let store = store_at("/srv");
        let before = store.get();
        let result = store.patch(
            &ConfigPatch::new()
                .log_level(Severity::Debug)
                .include_date_in_file_name()
                .exclude_date_from_file_name(),
        );
        assert!(result.is_err());
        assert_eq!(store.get(), before);
    }

    #[test]
    fn test_overwrite_once_then_append() {
        let store = store_at("/srv");
        let first = store.claim_file_write().unwrap();
        assert_eq!(first.mode, FileWriteMode::Overwrite);
        assert_eq!(store.file_write_state(), FileWriteState::Written);

        let second = store.claim_file_write().unwrap();
        assert_eq!(second.mode, FileWriteMode::Append);
        assert_eq!(second.path, first.path);
    }

    #[test]
    fn test_name_change_resets_write_state() {
        let store = store_at("/srv");
        store.claim_file_write();
        assert_eq!(store.file_write_state(), FileWriteState::Written);

        store.patch(&ConfigPatch::new().log_file_name("other.log")).unwrap();
        assert_eq!(store.file_write_state(), FileWriteState::NotYetWritten);

        store.claim_file_write();
        store.patch(&ConfigPatch::new().log_level(Severity::Debug)).unwrap();
        assert_eq!(store.file_write_state(), FileWriteState::Written);
    }

    #[test]
    fn test_append_mode_never_overwrites() {
        let store = store_at("/srv");
        store.patch(&ConfigPatch::new().append_to_log_file()).unwrap();
        assert_eq!(store.claim_file_write().unwrap().mode, FileWriteMode::Append);
    }

    #[test]
    fn test_blank_name_disables_file() {
        let store = store_at("/srv");
        store.patch(&ConfigPatch::new().log_file_name("")).unwrap();
        assert_eq!(store.resolved_file_path(), PathBuf::new());
        assert!(store.claim_file_write().is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = store_at("/srv");
        store
            .patch(
                &ConfigPatch::new()
                    .log_level(Severity::Off)
                    .message_format("{Message}")
                    .set_category_item("Audit", CategoryInfo::new().as_default()),
            )
            .unwrap();
        store.reset();

        let config = store.get();
        assert_eq!(config.threshold, Severity::Information);
        assert_eq!(config.categories.default_category(), None);
        assert_eq!(
            store.compiled_template().source(),
            LoggerConfiguration::default().template
        );
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("logger.json");

        let store = store_at("/srv");
        store.patch(&ConfigPatch::new().log_level(Severity::Verbose)).unwrap();
        store.save_json_file(&file).unwrap();

        let other = store_at("/srv");
        other.load_json_file(&file).unwrap();
        assert_eq!(other.get(), store.get());

        assert!(other.load_json_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_reset_keeps_write_state_for_same_path() {
        let store = store_at("/srv");
        let path = store.resolved_file_path();
        store.claim_file_write();

        store.patch(&ConfigPatch::new().log_level(Severity::Verbose)).unwrap();
        store.reset();
        assert_eq!(store.resolved_file_path(), path);
        assert_eq!(store.file_write_state(), FileWriteState::Written);
        assert_eq!(store.claim_file_write().unwrap().mode, FileWriteMode::Append);

        store.patch(&ConfigPatch::new().log_file_name("other.log")).unwrap();
        store.claim_file_write();
        store.reset();
        assert_eq!(store.resolved_file_path(), path);
        assert_eq!(store.file_write_state(), FileWriteState::NotYetWritten);
    }

    /// Clock a test can move forward
    struct SteppingClock {
        now: Mutex<DateTime<FixedOffset>>,
    }

    impl SteppingClock {
        fn advance(&self, by: Duration) {
            let mut now = self.now.lock();
            *now += by;
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.now.lock()
        }
    }

    #[test]
    fn test_date_rollover_starts_new_file() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .expect("valid date")
            .and_utc()
            .fixed_offset();
        let clock = Arc::new(SteppingClock {
            now: Mutex::new(start),
        });
        let store = ConfigurationStore::with_collaborators(
            Arc::new(FixedCallerResolver::new(CallerInfo::new("job", "1"), "/srv")),
            clock.clone(),
        );

        let first = store.claim_file_write().unwrap();
        assert!(first.path.ends_with("Logfile_20240101.log"));
        assert_eq!(first.mode, FileWriteMode::Overwrite);
        assert_eq!(store.claim_file_write().unwrap().mode, FileWriteMode::Append);

        clock.advance(Duration::minutes(2));
        let next = store.claim_file_write().unwrap();
        assert!(next.path.ends_with("Logfile_20240102.log"));
        assert_eq!(next.mode, FileWriteMode::Overwrite);
        assert_eq!(store.resolved_file_path(), next.path);
        assert_eq!(store.file_write_state(), FileWriteState::Written);

        assert_eq!(store.claim_file_write().unwrap().mode, FileWriteMode::Append);
    }

    #[test]
    fn test_undated_name_ignores_rollover() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .expect("valid date")
            .and_utc()
            .fixed_offset();
        let clock = Arc::new(SteppingClock {
            now: Mutex::new(start),
        });
        let store = ConfigurationStore::with_collaborators(
            Arc::new(FixedCallerResolver::new(CallerInfo::new("job", "1"), "/srv")),
            clock.clone(),
        );
        store.patch(&ConfigPatch::new().exclude_date_from_file_name()).unwrap();

        store.claim_file_write();
        clock.advance(Duration::days(1));
        let next = store.claim_file_write().unwrap();
        assert!(next.path.ends_with("Logfile.log"));
        assert_eq!(next.mode, FileWriteMode::Append);
    }
}
