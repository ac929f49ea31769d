//! Per-file downloads through an external CLI.
//!
//! The CLI is located on `PATH` once, when the fetcher is created. Commands run
//! through a [`CommandRunner`] so tests never spawn processes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use modelfetch_core::{FileFetcher, ProcessError};
use tokio::process::Command;
use tracing::debug;

use crate::config::CliFlavor;

/// A fully-specified command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Extra environment for the child only.
    pub envs: Vec<(String, String)>,
}

/// What a finished command reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl CommandOutput {
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs commands to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation`, capturing stderr. Spawn failures are `Err`.
    async fn run(&self, invocation: &CommandInvocation) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &CommandInvocation) -> std::io::Result<CommandOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// [`FileFetcher`] that shells out to `huggingface-cli` or `modelscope`.
pub struct CliFileFetcher {
    program: PathBuf,
    flavor: CliFlavor,
    runner: Arc<dyn CommandRunner>,
}

impl CliFileFetcher {
    pub fn new(program: impl Into<PathBuf>, flavor: CliFlavor, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            flavor,
            runner,
        }
    }

    /// Locate the flavor's executable on `PATH`.
    ///
    /// Returns `None` when it is not installed.
    pub fn locate(flavor: CliFlavor, runner: Arc<dyn CommandRunner>) -> Option<Self> {
        match which::which(flavor.program()) {
            Ok(path) => {
                debug!(program = %path.display(), "Found per-file download CLI");
                Some(Self::new(path, flavor, runner))
            }
            Err(e) => {
                debug!(program = flavor.program(), error = %e, "Per-file download CLI not found");
                None
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Build the command line for one file.
    pub fn invocation(
        &self,
        identifier: &str,
        relative_path: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> CommandInvocation {
        self.command(identifier, Some(relative_path), destination, token)
    }

    /// Build the command line for a whole repository.
    pub fn snapshot_invocation(
        &self,
        identifier: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> CommandInvocation {
        self.command(identifier, None, destination, token)
    }

    fn command(
        &self,
        identifier: &str,
        relative_path: Option<&str>,
        destination: &Path,
        token: Option<&str>,
    ) -> CommandInvocation {
        let mut args: Vec<OsString> = Vec::with_capacity(8);
        let mut envs = Vec::new();

        match self.flavor {
            CliFlavor::HuggingFace => {
                args.extend(["download", identifier].map(OsString::from));
                args.extend(relative_path.map(OsString::from));
                args.push(OsString::from("--local-dir"));
                args.push(destination.as_os_str().to_owned());
                if let Some(token) = token {
                    args.extend(["--token", token].map(OsString::from));
                }
            }
            CliFlavor::ModelScope => {
                args.extend(["download", "--model", identifier].map(OsString::from));
                args.extend(relative_path.map(OsString::from));
                args.push(OsString::from("--local_dir"));
                args.push(destination.as_os_str().to_owned());
                if let (Some(token), Some(var)) = (token, self.flavor.token_env_var()) {
                    envs.push((var.to_string(), token.to_string()));
                }
            }
        }

        CommandInvocation {
            program: self.program.clone(),
            args,
            envs,
        }
    }
}

#[async_trait]
impl FileFetcher for CliFileFetcher {
    async fn download_file(
        &self,
        identifier: &str,
        relative_path: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> Result<(), ProcessError> {
        let invocation = self.invocation(identifier, relative_path, destination, token);
        debug!(program = %invocation.program.display(), file = relative_path, "Running per-file download");
        self.execute(&invocation).await
    }
}

impl CliFileFetcher {
    /// Download the whole repository of `identifier` into `destination`.
    pub async fn download_snapshot(
        &self,
        identifier: &str,
        destination: &Path,
        token: Option<&str>,
    ) -> Result<(), ProcessError> {
        let invocation = self.snapshot_invocation(identifier, destination, token);
        debug!(program = %invocation.program.display(), model = identifier, "Running snapshot download");
        self.execute(&invocation).await
    }

    async fn execute(&self, invocation: &CommandInvocation) -> Result<(), ProcessError> {
        let output = self
            .runner
            .run(invocation)
            .await
            .map_err(|e| ProcessError::new(None, format!("failed to spawn {}: {e}", self.program.display())))?;

        if output.success() {
            Ok(())
        } else {
            Err(ProcessError::new(output.exit_code, output.stderr))
        }
    }
}
