//! External command execution.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// A command line and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    command: String,
    working_dir: PathBuf,
}

impl CommandInvocation {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Shell command text.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Directory the command runs in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` in {}", self.command, self.working_dir.display())
    }
}

/// Outcome of one command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Exit code 0; carries captured stdout.
    Success(String),

    /// Non-zero exit or spawn error; carries the diagnostic (usually stderr).
    Failure(String),
}

impl StepResult {
    /// Whether the command exited 0.
    pub fn is_success(&self) -> bool {
        matches!(self, StepResult::Success(_))
    }

    pub fn into_result(self) -> Result<String, String> {
        match self {
            StepResult::Success(stdout) => Ok(stdout),
            StepResult::Failure(diagnostic) => Err(diagnostic),
        }
    }
}

/// Runs one command line in a working directory.
///
/// A single attempt: no retries and no timeout.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, invocation: &CommandInvocation) -> StepResult;
}

/// Runs commands through the platform shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(&self, invocation: &CommandInvocation) -> StepResult {
        debug!(
            command = %invocation.command(),
            dir = %invocation.working_dir().display(),
            "Spawning command"
        );

        let child = match Self::shell_command(invocation.command())
            .current_dir(invocation.working_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return StepResult::Failure(format!("failed to spawn {}: {}", invocation, e));
            }
        };

        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(e) => return StepResult::Failure(format!("failed to wait for {}: {}", invocation, e)),
        };

        let exit_code = output.status.code();
        debug!(command = %invocation.command(), exit_code = ?exit_code, "Command finished");

        if output.status.success() {
            return StepResult::Success(String::from_utf8_lossy(&output.stdout).to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            return StepResult::Failure(stderr);
        }

        match exit_code {
            Some(code) => StepResult::Failure(format!("exited with status {}", code)),
            None => StepResult::Failure("terminated by signal".to_string()),
        }
    }
}
