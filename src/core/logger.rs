//! Main logger implementation

use super::{
    caller::{CallerInfo, CallerResolver, ProcessCallerResolver},
    config::LoggerConfiguration,
    error::Result,
    metrics::LoggerMetrics,
    patch::ConfigPatch,
    router::{MessageRouter, RoutingDecision, SubmitOptions, SubmitOutcome},
    severity::Severity,
    sink::Sink,
    store::ConfigurationStore,
    timestamp::{Clock, SystemClock},
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Routes messages through the configuration store and hands every
/// decision to the registered sinks.
///
/// Sink errors and panics are isolated per sink and counted in
/// [`LoggerMetrics`]; they never reach the caller.
pub struct Logger {
    router: MessageRouter,
    sinks: Arc<RwLock<Vec<Box<dyn Sink>>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger over the process-wide configuration store, with no sinks
    #[must_use]
    pub fn new() -> Self {
        Self::with_router(MessageRouter::new(
            ConfigurationStore::global(),
            Arc::new(ProcessCallerResolver),
            Arc::new(SystemClock),
        ))
    }

    fn with_router(router: MessageRouter) -> Self {
        Self {
            router,
            sinks: Arc::new(RwLock::new(Vec::new())),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Write one decision to every sink, isolating failures per sink
    fn process_sync(
        sinks: &mut [Box<dyn Sink>],
        decision: &RoutingDecision,
        metrics: &LoggerMetrics,
    ) {
        for sink in sinks.iter_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink.write(decision)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(_)) | Err(_) => {
                    metrics.record_sink_failure();
                }
            }
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn Sink>) {
        let mut sinks = self.sinks.write();
        sinks.push(sink);
    }

    pub fn store(&self) -> &Arc<ConfigurationStore> {
        self.router.store()
    }

    /// Copy of the current configuration
    pub fn configuration(&self) -> LoggerConfiguration {
        self.store().get()
    }

    pub fn patch_configuration(&self, patch: &ConfigPatch) -> Result<()> {
        self.store().patch(patch)
    }

    pub fn replace_configuration(&self, config: &LoggerConfiguration) -> Result<()> {
        self.store().replace(config)
    }

    pub fn reset_configuration(&self) {
        self.store().reset();
    }

    /// Whether a message of this severity would pass the current threshold
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity.passes(self.store().threshold())
    }

    /// Route a message and write it to the sinks
    ///
    /// Errors only for invalid arguments; sink failures are swallowed.
    pub fn submit(&self, message: impl AsRef<str>, options: &SubmitOptions) -> Result<SubmitOutcome> {
        // The overwrite grant and the write it allows must not interleave
        // with another submit on the same store
        let _writes = self.store().lock_writes();
        let outcome = self.router.submit(message.as_ref(), options)?;

        match outcome {
            SubmitOutcome::Suppressed => {
                self.metrics.record_suppressed();
            }
            SubmitOutcome::Routed(ref decision) => {
                self.metrics.record_routed();
                if decision.write_to_file() {
                    self.metrics.record_file_write();
                }
                let mut sinks = self.sinks.write();
                Self::process_sync(&mut sinks, decision, &self.metrics);
            }
        }

        Ok(outcome)
    }

    pub fn log(&self, severity: Severity, message: impl AsRef<str>) {
        // Only `Off` is rejected, and it is a no-op here
        let _ = self.submit(message, &SubmitOptions::new().severity(severity));
    }

    /// Log with an explicit caller identity, as the call-site macros do
    pub fn log_from(&self, severity: Severity, message: impl AsRef<str>, caller: CallerInfo) {
        let _ = self.submit(
            message,
            &SubmitOptions::new().severity(severity).caller(caller),
        );
    }

    /// Log in a category such as `"Success"` or `"Failure"`
    pub fn log_category(&self, severity: Severity, category: &str, message: impl AsRef<str>) {
        let _ = self.submit(
            message,
            &SubmitOptions::new().severity(severity).category(category),
        );
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.write();
        for sink in sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Severity::Warning, message);
    }

    #[inline]
    pub fn information(&self, message: impl AsRef<str>) {
        self.log(Severity::Information, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    pub fn verbose(&self, message: impl AsRef<str>) {
        self.log(Severity::Verbose, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Without an explicit store, the logger uses the process-wide store unless
/// a caller resolver or clock is given, in which case it gets a private
/// store sharing those collaborators.
///
/// # Example
/// ```
/// use message_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .store(Arc::new(ConfigurationStore::new()))
///     .sink(MemorySink::new())
///     .build();
/// logger.information("ready");
/// ```
pub struct LoggerBuilder {
    store: Option<Arc<ConfigurationStore>>,
    caller: Option<Arc<dyn CallerResolver>>,
    clock: Option<Arc<dyn Clock>>,
    sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            caller: None,
            clock: None,
            sinks: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn store(mut self, store: Arc<ConfigurationStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_resolver(mut self, caller: Arc<dyn CallerResolver>) -> Self {
        self.caller = Some(caller);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn build(self) -> Logger {
        let private = self.caller.is_some() || self.clock.is_some();
        let caller = self
            .caller
            .unwrap_or_else(|| Arc::new(ProcessCallerResolver));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let store = match self.store {
            Some(store) => store,
            None if private => Arc::new(ConfigurationStore::with_collaborators(
                Arc::clone(&caller),
                Arc::clone(&clock),
            )),
            None => ConfigurationStore::global(),
        };

        let mut logger = Logger::with_router(MessageRouter::new(store, caller, clock));
        for sink in self.sinks {
            logger.add_sink(sink);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
