//! Message routing
//!
//! [`MessageRouter::submit`] decides, for one message, whether it passes
//! the severity threshold, how it renders, where it goes (host or streams),
//! which color it is shown in and whether it is written to the log file.
//! It performs no I/O itself; the returned [`RoutingDecision`] is executed
//! by sinks.
//!
//! Precedence is always: per-call option, then configuration, then
//! built-in default.

use super::caller::{CallerInfo, CallerResolver};
use super::color::Color;
use super::error::Result;
use super::severity::Severity;
use super::store::{ConfigurationStore, FileWrite};
use super::template::{CompiledTemplate, RenderContext, TemplateCache};
use super::timestamp::Clock;
use std::sync::Arc;

/// Where the rendered line is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Interactive console output, optionally colored
    Host,
    /// Output stream matching the message severity
    Streams,
}

/// Per-call overrides for [`MessageRouter::submit`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub severity: Option<Severity>,
    pub category: Option<String>,
    pub host_color: Option<Color>,
    pub template: Option<String>,
    pub destination: Option<Destination>,
    pub write_to_file: Option<bool>,
    /// Explicit caller identity; skips the caller resolver
    pub caller: Option<CallerInfo>,
}

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Parse a severity name such as `"Warning"`
    pub fn severity_name(self, name: &str) -> Result<Self> {
        Ok(self.severity(name.parse()?))
    }

    #[must_use = "builder methods return a new value"]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn host_color(mut self, color: Color) -> Self {
        self.host_color = Some(color);
        self
    }

    /// Parse a color name such as `"DarkYellow"`
    pub fn host_color_name(self, name: &str) -> Result<Self> {
        Ok(self.host_color(name.parse()?))
    }

    #[must_use = "builder methods return a new value"]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn write_to_file(mut self, write: bool) -> Self {
        self.write_to_file = Some(write);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, caller: CallerInfo) -> Self {
        self.caller = Some(caller);
        self
    }
}

/// Everything a sink needs to emit one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub rendered_text: String,
    pub destination: Destination,
    /// Host color; always `None` for the streams destination
    pub color: Option<Color>,
    pub stream_kind: Severity,
    /// Present when the message must also be written to the log file
    pub file: Option<FileWrite>,
}

impl RoutingDecision {
    #[inline]
    pub fn write_to_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Result of a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Routed(RoutingDecision),
    /// Below the threshold; nothing was resolved or rendered
    Suppressed,
}

impl SubmitOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, SubmitOutcome::Suppressed)
    }

    pub fn decision(&self) -> Option<&RoutingDecision> {
        match self {
            SubmitOutcome::Routed(decision) => Some(decision),
            SubmitOutcome::Suppressed => None,
        }
    }

    pub fn into_decision(self) -> Option<RoutingDecision> {
        match self {
            SubmitOutcome::Routed(decision) => Some(decision),
            SubmitOutcome::Suppressed => None,
        }
    }
}

/// File eligibility before the caller is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilePolicy {
    Never,
    Always,
    ByContext { from_script: bool, from_host: bool },
}

/// Decisions taken from one consistent read of the configuration
struct Plan {
    template: Arc<CompiledTemplate>,
    category: String,
    destination: Destination,
    color: Option<Color>,
    file_policy: FilePolicy,
}

pub struct MessageRouter {
    store: Arc<ConfigurationStore>,
    caller: Arc<dyn CallerResolver>,
    clock: Arc<dyn Clock>,
    templates: TemplateCache,
}

impl MessageRouter {
    pub fn new(
        store: Arc<ConfigurationStore>,
        caller: Arc<dyn CallerResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            caller,
            clock,
            templates: TemplateCache::default(),
        }
    }

    pub fn store(&self) -> &Arc<ConfigurationStore> {
        &self.store
    }

    /// Route one message
    ///
    /// Fails only on invalid arguments (an `Off` severity), before any
    /// resolution happens.
    pub fn submit(&self, message: &str, options: &SubmitOptions) -> Result<SubmitOutcome> {
        let severity = options
            .severity
            .unwrap_or(Severity::Information)
            .ensure_message_level()?;

        if !severity.passes(self.store.threshold()) {
            return Ok(SubmitOutcome::Suppressed);
        }

        let plan = self.plan(severity, options);

        let needs_caller =
            plan.template.needs_caller() || matches!(plan.file_policy, FilePolicy::ByContext { .. });
        let caller = if needs_caller {
            Some(
                options
                    .caller
                    .clone()
                    .unwrap_or_else(|| self.caller.resolve_caller()),
            )
        } else {
            None
        };

        let rendered_text = plan.template.render(&RenderContext {
            message,
            severity,
            category: &plan.category,
            caller: caller.as_ref(),
            timestamp: self.clock.now(),
        });

        let eligible = match plan.file_policy {
            FilePolicy::Never => false,
            FilePolicy::Always => true,
            FilePolicy::ByContext {
                from_script,
                from_host,
            } => {
                // An unresolved caller is treated as host context
                let interactive = caller.as_ref().map_or(true, |c| c.is_interactive);
                if interactive {
                    from_host
                } else {
                    from_script
                }
            }
        };
        let file = if eligible {
            self.store.claim_file_write()
        } else {
            None
        };

        Ok(SubmitOutcome::Routed(RoutingDecision {
            rendered_text,
            destination: plan.destination,
            color: plan.color,
            stream_kind: severity,
            file,
        }))
    }

    fn plan(&self, severity: Severity, options: &SubmitOptions) -> Plan {
        let override_template = options
            .template
            .as_deref()
            .map(|template| self.templates.get_or_compile(template));

        self.store.read(|config, configured_template| {
            let template =
                override_template.unwrap_or_else(|| Arc::clone(configured_template));

            let category = options
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .or_else(|| config.categories.default_category())
                .unwrap_or("")
                .to_string();

            let destination = options.destination.unwrap_or(if config.write_to_host_default {
                Destination::Host
            } else {
                Destination::Streams
            });

            let color = match destination {
                Destination::Streams => None,
                Destination::Host => options
                    .host_color
                    .or_else(|| {
                        if category.is_empty() {
                            None
                        } else {
                            config.categories.color_of(&category)
                        }
                    })
                    .or_else(|| config.host_colors.get(&severity).copied()),
            };

            let file = &config.file;
            let file_policy = match options.write_to_file {
                Some(true) => FilePolicy::Always,
                Some(false) => FilePolicy::Never,
                None if !file.is_enabled() => FilePolicy::Never,
                None if file.write_from_script_default == file.write_from_host_default => {
                    if file.write_from_script_default {
                        FilePolicy::Always
                    } else {
                        FilePolicy::Never
                    }
                }
                None => FilePolicy::ByContext {
                    from_script: file.write_from_script_default,
                    from_host: file.write_from_host_default,
                },
            };

            Plan {
                template,
                category,
                destination,
                color,
                file_policy,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::category::CategoryInfo;
    use crate::core::patch::ConfigPatch;
    use crate::core::store::FileWriteMode;
    use crate::core::timestamp::FixedClock;
    use crate::core::LoggerError;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
        caller: CallerInfo,
    }

    impl CallerResolver for CountingResolver {
        fn resolve_caller(&self) -> CallerInfo {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.caller.clone()
        }

        fn caller_base_directory(&self) -> std::path::PathBuf {
            std::path::PathBuf::from("/srv/app")
        }
    }

    fn clock() -> Arc<FixedClock> {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(8, 15, 0))
            .expect("valid date");
        Arc::new(FixedClock::from_naive(naive))
    }

    fn router_with(caller: CallerInfo) -> (MessageRouter, Arc<CountingResolver>) {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
            caller,
        });
        let clock = clock();
        let store = Arc::new(ConfigurationStore::with_collaborators(
            resolver.clone(),
            clock.clone(),
        ));
        (MessageRouter::new(store, resolver.clone(), clock), resolver)
    }

    fn router() -> MessageRouter {
        router_with(CallerInfo::new("job", "7")).0
    }

    fn routed(router: &MessageRouter, message: &str, options: SubmitOptions) -> RoutingDecision {
        router
            .submit(message, &options)
            .unwrap()
            .into_decision()
            .expect("message should be routed")
    }

    #[test]
    fn test_threshold_suppresses_without_resolution() {
        let (router, resolver) = router_with(CallerInfo::new("job", "7"));
        let outcome = router
            .submit("hi", &SubmitOptions::new().severity(Severity::Debug))
            .unwrap();

        assert!(outcome.is_suppressed());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(router.store().file_write_state(), crate::core::FileWriteState::NotYetWritten);
    }

    #[test]
    fn test_off_threshold_suppresses_everything() {
        let router = router();
        router.store().patch(&ConfigPatch::new().log_level(Severity::Off)).unwrap();
        let outcome = router
            .submit("boom", &SubmitOptions::new().severity(Severity::Error))
            .unwrap();
        assert!(outcome.is_suppressed());
    }

    #[test]
    fn test_off_severity_rejected() {
        let router = router();
        let err = router
            .submit("hi", &SubmitOptions::new().severity(Severity::Off))
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidSeverity { .. }));
    }

    #[test]
    fn test_level_and_message_template() {
        let router = router();
        router
            .store()
            .patch(&ConfigPatch::new().message_format("{MessageLevel} | {Message}"))
            .unwrap();
        let decision = routed(&router, "hi", SubmitOptions::new().severity(Severity::Error));
        assert_eq!(decision.rendered_text, "ERROR | hi");
        assert_eq!(decision.stream_kind, Severity::Error);
    }

    #[test]
    fn test_timestamp_uses_clock() {
        let router = router();
        router
            .store()
            .patch(&ConfigPatch::new().message_format("{Timestamp:yyyy} {Message}"))
            .unwrap();
        assert_eq!(routed(&router, "hi", SubmitOptions::new()).rendered_text, "2024 hi");
    }

    #[test]
    fn test_template_override_wins() {
        let router = router();
        let decision = routed(&router, "hi", SubmitOptions::new().template("<{Message}>"));
        assert_eq!(decision.rendered_text, "<hi>");
    }

    #[test]
    fn test_caller_resolved_only_when_needed() {
        let (router, resolver) = router_with(CallerInfo::new("job", "7"));
        router
            .store()
            .patch(
                &ConfigPatch::new()
                    .message_format("{Message}")
                    .log_file_name(""),
            )
            .unwrap();
        routed(&router, "hi", SubmitOptions::new());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

        let decision = routed(
            &router,
            "hi",
            SubmitOptions::new().template("{CallerName}@{CallerLineNumber}"),
        );
        assert_eq!(decision.rendered_text, "job@7");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);

        let decision = routed(
            &router,
            "hi",
            SubmitOptions::new()
                .template("{CallerName}")
                .caller(CallerInfo::from_location("app::main", 3)),
        );
        assert_eq!(decision.rendered_text, "app::main");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_category_color_on_host() {
        let router = router();
        router
            .store()
            .patch(&ConfigPatch::new().category_info(
                crate::core::CategoryTable::from_items([("Success", CategoryInfo::colored(Color::Green))])
                    .unwrap(),
            ))
            .unwrap();
        let decision = routed(
            &router,
            "done",
            SubmitOptions::new()
                .category("Success")
                .destination(Destination::Host),
        );
        assert_eq!(decision.destination, Destination::Host);
        assert_eq!(decision.color, Some(Color::Green));
    }

    #[test]
    fn test_color_precedence() {
        let router = router();
        let decision = routed(
            &router,
            "x",
            SubmitOptions::new()
                .category("Success")
                .host_color(Color::Magenta),
        );
        assert_eq!(decision.color, Some(Color::Magenta));

        let decision = routed(&router, "x", SubmitOptions::new().severity(Severity::Warning));
        assert_eq!(decision.color, Some(Color::Yellow));

        let decision = routed(
            &router,
            "x",
            SubmitOptions::new().category("Unlisted").severity(Severity::Error),
        );
        assert_eq!(decision.color, Some(Color::Red));
    }

    #[test]
    fn test_streams_ignore_color() {
        let router = router();
        router.store().patch(&ConfigPatch::new().write_to_streams()).unwrap();
        let decision = routed(&router, "x", SubmitOptions::new().host_color(Color::Red));
        assert_eq!(decision.destination, Destination::Streams);
        assert_eq!(decision.color, None);

        let decision = routed(&router, "x", SubmitOptions::new().destination(Destination::Host));
        assert_eq!(decision.destination, Destination::Host);
    }

    #[test]
    fn test_default_category() {
        let router = router();
        router
            .store()
            .patch(
                &ConfigPatch::new()
                    .message_format("[{Category}] {Message}")
                    .set_category_item("Audit", CategoryInfo::colored(Color::DarkCyan).as_default()),
            )
            .unwrap();
        let decision = routed(&router, "x", SubmitOptions::new().category("   "));
        assert_eq!(decision.rendered_text, "[Audit] x");
        assert_eq!(decision.color, Some(Color::DarkCyan));

        let decision = routed(&router, "x", SubmitOptions::new().category(" Failure "));
        assert_eq!(decision.rendered_text, "[Failure] x");
    }

    #[test]
    fn test_file_eligibility_by_context() {
        // Script context with defaults: script writes, host does not
        let router = router();
        let decision = routed(&router, "x", SubmitOptions::new());
        let file = decision.file.expect("script callers write to file");
        assert_eq!(file.mode, FileWriteMode::Overwrite);
        assert!(file.path.ends_with("Logfile_20240101.log"));

        let (router, _) = router_with(CallerInfo::console());
        assert!(!routed(&router, "x", SubmitOptions::new()).write_to_file());

        let (router, _) = router_with(CallerInfo::unknown());
        router
            .store()
            .patch(&ConfigPatch::new().enable_file_logging_from_host().disable_file_logging_from_script())
            .unwrap();
        assert!(routed(&router, "x", SubmitOptions::new()).write_to_file());
    }

    #[test]
    fn test_file_override_wins() {
        let (router, _) = router_with(CallerInfo::console());
        assert!(routed(&router, "x", SubmitOptions::new().write_to_file(true)).write_to_file());

        let router = self::router();
        assert!(!routed(&router, "x", SubmitOptions::new().write_to_file(false)).write_to_file());

        router.store().patch(&ConfigPatch::new().log_file_name(" ")).unwrap();
        assert!(!routed(&router, "x", SubmitOptions::new().write_to_file(true)).write_to_file());
    }

    #[test]
    fn test_overwrite_then_append() {
        let router = router();
        let modes: Vec<_> = (0..3)
            .map(|_| routed(&router, "x", SubmitOptions::new()).file.map(|f| f.mode))
            .collect();
        assert_eq!(
            modes,
            vec![
                Some(FileWriteMode::Overwrite),
                Some(FileWriteMode::Append),
                Some(FileWriteMode::Append)
            ]
        );

        router.store().patch(&ConfigPatch::new().log_file_name("next.log")).unwrap();
        let file = routed(&router, "x", SubmitOptions::new()).file.unwrap();
        assert_eq!(file.mode, FileWriteMode::Overwrite);
        assert!(file.path.ends_with("next_20240101.log"));
    }

    #[test]
    fn test_string_options() {
        assert!(SubmitOptions::new().severity_name("Loud").is_err());
        assert!(SubmitOptions::new().host_color_name("Purple").is_err());
        let options = SubmitOptions::new()
            .severity_name("warning")
            .and_then(|o| o.host_color_name("darkred"))
            .unwrap();
        assert_eq!(options.severity, Some(Severity::Warning));
        assert_eq!(options.host_color, Some(Color::DarkRed));
    }
}
