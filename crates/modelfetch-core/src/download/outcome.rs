//! Download outcomes.
//!
//! An outcome is what the orchestrator hands back to its caller: one success
//! flag, one human-readable message, and (for selective transfers) the status
//! of every requested file.

use std::path::PathBuf;

use serde::Serialize;

use super::errors::FetchError;

/// What happened to one requested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// The file was transferred.
    Downloaded,
    /// The file was in the exclusion list and not transferred.
    Skipped,
    /// The transfer failed; the batch continued.
    Failed(FetchError),
    /// The run was cancelled before this file was attempted.
    Cancelled,
}

impl FileStatus {
    /// Whether this status counts as a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-file entry of a selective transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Relative path as requested.
    pub path: String,
    /// What happened to it.
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Aggregate counts over a batch of [`FileOutcome`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub requested: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    /// Reduce per-file outcomes into counts. Independent of completion order.
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                requested: outcomes.len(),
                ..Self::default()
            },
            |mut acc, outcome| {
                match outcome.status {
                    FileStatus::Downloaded => acc.downloaded += 1,
                    FileStatus::Skipped => acc.skipped += 1,
                    FileStatus::Failed(_) => acc.failed += 1,
                    FileStatus::Cancelled => acc.cancelled += 1,
                }
                acc
            },
        )
    }
}

/// Terminal result of one orchestrator run for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Whether the run completed without any failure.
    pub success: bool,
    /// Human-readable status line.
    pub message: String,
    /// Destination directory, when one was resolved.
    pub destination: Option<PathBuf>,
    /// Per-file results (selective transfers only).
    pub files: Vec<FileOutcome>,
    /// The error that stopped the request before any transfer, if any.
    pub error: Option<FetchError>,
}

impl DownloadOutcome {
    /// A successful outcome.
    pub fn success(message: impl Into<String>, destination: Option<PathBuf>) -> Self {
        Self {
            success: true,
            message: message.into(),
            destination,
            files: Vec::new(),
            error: None,
        }
    }

    /// A failed outcome carrying the error's message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            destination: None,
            files: Vec::new(),
            error: None,
        }
    }

    /// A failed outcome for a request-level error, keeping the error's kind.
    #[must_use]
    pub fn from_error(err: FetchError) -> Self {
        Self {
            error: Some(err.clone()),
            ..Self::failure(err.to_string())
        }
    }

    /// Attach per-file results. A failed file marks the outcome unsuccessful.
    #[must_use]
    pub fn with_files(mut self, files: Vec<FileOutcome>) -> Self {
        if files.iter().any(|f| f.status.is_failure()) {
            self.success = false;
        }
        self.files = files;
        self
    }

    /// Counts over the per-file results.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_outcomes(&self.files)
    }

    /// Merge outcomes of several models into one, preserving input order.
    ///
    /// A single outcome is returned as is; the error kind is only kept when
    /// there was exactly one model.
    pub fn merge(mut outcomes: Vec<Self>) -> Self {
        if outcomes.len() == 1
            && let Some(outcome) = outcomes.pop()
        {
            return outcome;
        }

        let success = outcomes.iter().all(|o| o.success);
        let message = outcomes
            .iter()
            .map(|o| o.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let files = outcomes.into_iter().flat_map(|o| o.files).collect();

        Self {
            success,
            message,
            destination: None,
            files,
            error: None,
        }
    }
}
