//! Terminal progress rendering for downloads.
//!
//! Draws an indicatif bar on an interactive stderr and falls back to one
//! plain line per event otherwise.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use modelfetch_core::{ProgressEvent, ProgressSink};

const MAX_LABEL: usize = 60;

/// Progress sink that renders events on the terminal.
pub struct TerminalProgressSink {
    inner: ProgressRender,
}

enum ProgressRender {
    Fancy(ProgressBar),
    Plain,
}

impl TerminalProgressSink {
    /// Create a sink, auto-detecting terminal capability.
    pub fn new() -> Self {
        if io::stderr().is_terminal() {
            Self::with_bar(ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr()))
        } else {
            Self {
                inner: ProgressRender::Plain,
            }
        }
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(spinner_style());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            inner: ProgressRender::Fancy(bar),
        }
    }

    /// Finish and clear the progress display.
    pub fn finish(&self) {
        if let ProgressRender::Fancy(bar) = &self.inner {
            bar.finish_and_clear();
        }
    }
}

impl Default for TerminalProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgressSink {
    fn emit(&self, event: ProgressEvent) {
        match &self.inner {
            ProgressRender::Fancy(bar) => render_bar(bar, &event),
            ProgressRender::Plain => {
                if event.is_determinate() {
                    eprintln!("[{}/{}] {}", event.value, event.max, event.text);
                } else {
                    eprintln!("{}", event.text);
                }
            }
        }
    }
}

fn render_bar(bar: &ProgressBar, event: &ProgressEvent) {
    if event.is_determinate() {
        let max = u64::try_from(event.max).unwrap_or(0);
        if bar.length() != Some(max) {
            bar.set_style(bar_style());
            bar.set_length(max);
        }
        bar.set_position(u64::try_from(event.value).unwrap_or(0).min(max));
    }
    bar.set_message(format_label(&event.text));
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{bar:28.cyan/blue} {pos:>3}/{len:3} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn format_label(raw: &str) -> String {
    if raw.chars().count() <= MAX_LABEL {
        return raw.to_string();
    }
    let mut buf: String = raw.chars().take(MAX_LABEL - 1).collect();
    buf.push('…');
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_sink() -> (TerminalProgressSink, ProgressBar) {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        (TerminalProgressSink::with_bar(bar.clone()), bar)
    }

    #[test]
    fn test_bar_follows_events() {
        let (sink, bar) = hidden_sink();

        sink.emit(ProgressEvent::new(0, 3, "Downloading file 1/3: a.bin"));
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 0);

        sink.emit(ProgressEvent::new(2, 3, "Downloaded b.bin"));
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "Downloaded b.bin");
        sink.finish();
    }

    #[test]
    fn test_indeterminate_event_keeps_spinner() {
        let (sink, bar) = hidden_sink();
        sink.emit(ProgressEvent::new(0, 0, "Resolving"));
        assert_eq!(bar.length(), None);
        assert_eq!(bar.message(), "Resolving");
    }

    #[test]
    fn test_format_label_truncates() {
        assert_eq!(format_label("short"), "short");

        let long = "x".repeat(MAX_LABEL + 10);
        let label = format_label(&long);
        assert_eq!(label.chars().count(), MAX_LABEL);
        assert!(label.ends_with('…'));
    }
}
