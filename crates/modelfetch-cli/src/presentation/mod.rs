//! Terminal presentation for CLI output.

pub mod progress;

pub use progress::TerminalProgressSink;
