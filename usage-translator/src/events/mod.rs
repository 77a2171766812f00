//! Per-record pipeline events.
//!
//! Transformers report dropped records and emitted rows through an
//! [`EventSink`] instead of logging directly. The binary uses
//! [`TracingSink`]; tests use [`MemorySink`] and assert on what was recorded.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Receives record-level events from the transformers.
pub trait EventSink: Send + Sync {
    /// A record was rejected.
    fn record_error(&self, message: &str);

    /// A chargeable row was emitted for `product` from `item_count` raw units.
    fn record_success(&self, product: &str, item_count: i64);
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PipelineEvent {
    Error {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Success {
        product: String,
        item_count: i64,
    },
}

// =============================================================================
// Sinks
// =============================================================================

/// Forwards events to `tracing`.
///
/// Errors go out at `warn`, successes at `debug` so a normal run only shows
/// the rejected records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record_error(&self, message: &str) {
        tracing::warn!(target: "usage_translator::records", "{message}");
    }

    fn record_success(&self, product: &str, item_count: i64) {
        tracing::debug!(
            target: "usage_translator::records",
            product,
            item_count,
            "chargeable row emitted"
        );
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record_error(&self, _message: &str) {}

    fn record_success(&self, _product: &str, _item_count: i64) {}
}

/// Keeps events in memory, in the order they were recorded.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.lock().clone()
    }

    /// Messages of the recorded error events.
    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Error { message } => Some(message.clone()),
                PipelineEvent::Success { .. } => None,
            })
            .collect()
    }

    /// Number of recorded success events.
    pub fn success_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, PipelineEvent::Success { .. }))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PipelineEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for MemorySink {
    fn record_error(&self, message: &str) {
        self.lock().push(PipelineEvent::Error {
            message: message.to_string(),
        });
    }

    fn record_success(&self, product: &str, item_count: i64) {
        self.lock().push(PipelineEvent::Success {
            product: product.to_string(),
            item_count,
        });
    }
}
