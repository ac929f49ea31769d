//! Download command handler.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use modelfetch_core::{Category, DownloadOutcome, DownloadRequest, DownloadStrategy};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::TerminalProgressSink;

/// Download command arguments passed from the CLI.
#[derive(Debug, Default)]
pub struct DownloadArgs {
    pub identifier: String,
    pub files: Option<String>,
    pub exclude: Option<String>,
    pub category: Category,
    pub dest: Option<PathBuf>,
    pub snapshot: bool,
    pub token: Option<String>,
    pub collection: bool,
    pub public: bool,
}

impl DownloadArgs {
    /// Translate the arguments into a download request.
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest::new(self.identifier.as_str())
            .with_files_csv(self.files.as_deref().unwrap_or_default())
            .with_exclude_csv(self.exclude.as_deref().unwrap_or_default())
            .with_category(self.category)
            .with_destination(self.dest.clone())
            .with_strategy(DownloadStrategy::from_full_model_flag(self.snapshot))
            .with_token(self.token.clone())
            .with_expand_collection(self.collection)
            .with_authorize_collection(!self.public)
    }
}

/// Exit status used when a second interrupt aborts the process.
const INTERRUPTED_EXIT: i32 = 130;

/// Execute the download command.
///
/// The first Ctrl-C stops a selective download before the next file and
/// abandons a running snapshot; a second one exits at once.
pub async fn execute(ctx: &CliContext, args: DownloadArgs) -> Result<()> {
    let request = args.to_request();

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            warn!("Interrupt received, stopping the download (press Ctrl-C again to exit now)");
            cancel.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(INTERRUPTED_EXIT);
            }
        })
    };

    let sink = Arc::new(TerminalProgressSink::new());
    let outcome = ctx
        .orchestrator()
        .with_sink(sink.clone())
        .with_cancellation(cancel)
        .run(&request)
        .await;
    sink.finish();
    watcher.abort();

    if outcome.error.is_none() {
        println!("{}", outcome.message);
    }
    outcome_status(outcome).map_err(Into::into)
}

/// Map an outcome to the command's result.
///
/// Request-level errors keep their kind, so they exit with the same code as
/// any other command; anything else unsuccessful is [`CliError::Incomplete`].
fn outcome_status(outcome: DownloadOutcome) -> Result<(), CliError> {
    if outcome.success {
        return Ok(());
    }
    Err(outcome.error.map_or(CliError::Incomplete, CliError::from))
}
