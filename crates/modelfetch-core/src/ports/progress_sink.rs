//! Progress sink port.
//!
//! The orchestrator reports progress as `{value, max, text}` events. Where the
//! events go (terminal bar, UI websocket, log) is the sink's business.

use serde::{Deserialize, Serialize};

/// One progress update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Units completed so far.
    pub value: i64,
    /// Total units; `0` means no meaningful progress is available.
    pub max: i64,
    /// Human-readable status line.
    pub text: String,
}

impl ProgressEvent {
    pub fn new(value: i64, max: i64, text: impl Into<String>) -> Self {
        Self {
            value,
            max,
            text: text.into(),
        }
    }

    /// Whether this event carries a usable ratio.
    #[must_use]
    pub const fn is_determinate(&self) -> bool {
        self.max > 0
    }
}

/// Port for receiving progress events.
///
/// Fire-and-forget: implementations must not block and cannot fail.
pub trait ProgressSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: ProgressEvent);
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: ProgressEvent) {}
}
