//! Repository sync: clean, fetch and hard-reset a working directory in the background.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::LaunchError;

pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const REMOTE_NAME: &str = "origin";

/// Shell command line that makes a working directory match the remote branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCommand {
    pub tracked_ref: String,
    pub script: String,
}

impl SyncCommand {
    /// Clean untracked/ignored files, fetch only `tracked_ref` from origin, then reset to it.
    /// Steps are joined with `;` so a failing step does not stop the next one.
    pub fn for_ref(tracked_ref: &str) -> Self {
        Self {
            tracked_ref: tracked_ref.to_string(),
            script: format!(
                "git clean -dfx; git fetch {} {}; git reset --hard FETCH_HEAD",
                REMOTE_NAME, tracked_ref
            ),
        }
    }
}

/// Identifies one launched sync in the logs.
#[derive(Debug, Clone)]
pub struct LaunchHandle {
    pub id: Uuid,
    pub pid: Option<u32>,
    pub started_at: DateTime<Utc>,
}

/// Starts a sync without waiting for it. Only the launch itself can fail.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, working_dir: &Path, command: &SyncCommand)
    -> Result<LaunchHandle, LaunchError>;
}

/// Runs the sync through `sh -c`. The child is awaited on a detached task
/// that only logs how it ended.
#[derive(Debug, Clone)]
pub struct ShellLauncher {
    shell: PathBuf,
}

impl ShellLauncher {
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher for ShellLauncher {
    fn launch(
        &self,
        working_dir: &Path,
        command: &SyncCommand,
    ) -> Result<LaunchHandle, LaunchError> {
        info!(
            "Running (cwd = '{}'): {}",
            working_dir.display(),
            command.script
        );
        let child = Command::new(&self.shell)
            .current_dir(working_dir)
            .arg("-c")
            .arg(&command.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                error!("sync failed to start: {}", e);
                LaunchError {
                    program: self.shell.display().to_string(),
                    working_dir: working_dir.display().to_string(),
                    source: e,
                }
            })?;

        let handle = LaunchHandle {
            id: Uuid::now_v7(),
            pid: child.id(),
            started_at: Utc::now(),
        };

        let sync_id = handle.id;
        let started_at = handle.started_at;
        let dir = working_dir.display().to_string();
        tokio::spawn(async move {
            let output = match child.wait_with_output().await {
                Ok(output) => output,
                Err(e) => {
                    error!("Sync {} in '{}': could not wait for process: {}", sync_id, dir, e);
                    return;
                }
            };
            let elapsed_ms = (Utc::now() - started_at).num_milliseconds();
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if output.status.success() {
                info!(
                    "Sync {} in '{}' finished in {}ms\n{}",
                    sync_id, dir, elapsed_ms, stdout
                );
            } else {
                warn!(
                    "Sync {} in '{}' exited with {} after {}ms\n{}{}",
                    sync_id, dir, output.status, elapsed_ms, stdout, stderr
                );
            }
        });

        Ok(handle)
    }
}
