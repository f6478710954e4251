//! In-memory sink that records every decision it receives

use crate::core::{Result, RoutingDecision, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records decisions; clones share the same buffer so a test can keep a
/// handle after giving the sink to a logger
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    decisions: Arc<Mutex<Vec<RoutingDecision>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> Vec<RoutingDecision> {
        self.decisions.lock().clone()
    }

    /// Rendered text of every recorded decision
    pub fn lines(&self) -> Vec<String> {
        self.decisions
            .lock()
            .iter()
            .map(|d| d.rendered_text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.decisions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.decisions.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, decision: &RoutingDecision) -> Result<()> {
        self.decisions.lock().push(decision.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
