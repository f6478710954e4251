//! Sink trait for routed message output

use super::{error::Result, router::RoutingDecision};

/// Executes routing decisions: console, streams, files.
///
/// A sink picks the parts of a decision it handles and ignores the rest.
pub trait Sink: Send + Sync {
    fn write(&mut self, decision: &RoutingDecision) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
