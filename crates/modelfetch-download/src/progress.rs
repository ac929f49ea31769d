//! Progress counting and byte formatting.

use std::sync::Arc;

use modelfetch_core::{ProgressEvent, ProgressSink};

const BYTE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Counts units of work and forwards every update to a sink.
///
/// A total of zero or less means there is no meaningful progress: the
/// counter stays at zero and events carry `max = 0`.
pub struct ProgressReporter {
    total: i64,
    current: i64,
    last_message: String,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressReporter {
    pub fn new(total: i64, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            total: total.max(0),
            current: 0,
            last_message: String::new(),
            sink,
        }
    }

    /// Advance by `delta` (clamped to `[0, total]`) and emit an event.
    ///
    /// `delta = 0` only pushes a status line. Without `text` the line is
    /// `Progress: {current}/{total}`.
    pub fn update(&mut self, delta: i64, text: Option<&str>) -> ProgressEvent {
        self.current = self.current.saturating_add(delta).clamp(0, self.total);
        self.last_message = text.map_or_else(
            || format!("Progress: {}/{}", self.current, self.total),
            String::from,
        );

        let event = ProgressEvent::new(self.current, self.total, self.last_message.clone());
        self.sink.emit(event.clone());
        event
    }

    pub const fn total(&self) -> i64 {
        self.total
    }

    pub const fn current(&self) -> i64 {
        self.current
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }
}

/// Human-readable byte size using 1024-based units.
///
/// Values are rounded to two decimals and printed with at least one
/// (`1536` is `"1.5 KB"`, `1024` is `"1.0 KB"`). Non-positive input is `"0B"`.
pub fn format_bytes(size: i64) -> String {
    if size <= 0 {
        return "0B".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut number = format!("{value:.2}");
    while number.ends_with('0') {
        number.pop();
    }
    if number.ends_with('.') {
        number.push('0');
    }
    format!("{number} {}", BYTE_UNITS[unit])
}
