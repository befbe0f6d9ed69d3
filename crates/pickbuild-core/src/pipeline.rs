//! Build pipeline orchestration.
//!
//! Eight steps run strictly in order; the first failure aborts the run and
//! nothing after it executes. Side effects of completed steps (a fresh clone,
//! an installed dependency tree) are left in place.

use crate::branch;
use crate::config::{InstallPolicy, PipelineConfig};
use crate::error::{PipelineFailure, StepError};
use crate::git;
use crate::manifest;
use crate::obs;
use crate::progress::{self, ProgressIndicator, SilentProgress};
use crate::prompt::Prompter;
use crate::reporter::{Reporter, SilentReporter};
use crate::repository::RepositoryLocator;
use crate::runner::{CommandInvocation, ProcessRunner};
use crate::skip;
use crate::step::Step;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, Instrument};
use uuid::Uuid;

/// What the operator asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Repository locator. Without one, the base directory is used as is.
    pub repository: Option<String>,

    /// Use the base directory instead of cloning; it must be named after
    /// the repository.
    pub skip_clone: bool,
}

impl PipelineRequest {
    /// Clone `repository` into the base directory.
    pub fn clone_from(repository: impl Into<String>) -> Self {
        Self {
            repository: Some(repository.into()),
            skip_clone: false,
        }
    }

    /// Work in the base directory, checking its name against `repository`
    /// when one is given.
    pub fn in_place(repository: Option<String>) -> Self {
        Self {
            repository,
            skip_clone: true,
        }
    }
}

/// Result of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: Uuid,

    /// Directory every step after Acquire ran in.
    pub working_dir: PathBuf,

    /// Branch that was checked out.
    pub branch: String,

    /// Full build command that ran, e.g. `npm run build`.
    pub build_command: String,

    pub install_skipped: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Sequential build pipeline.
pub struct BuildPipeline {
    config: PipelineConfig,
    runner: Arc<dyn ProcessRunner>,
    prompter: Arc<dyn Prompter>,
    progress: Arc<dyn ProgressIndicator>,
    reporter: Arc<dyn Reporter>,
}

impl BuildPipeline {
    /// Pipeline with no progress output and no operator messages.
    pub fn new(
        config: PipelineConfig,
        runner: Arc<dyn ProcessRunner>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            config,
            runner,
            prompter,
            progress: Arc::new(SilentProgress),
            reporter: Arc::new(SilentReporter),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressIndicator>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all eight steps.
    ///
    /// Returns the report on completion, or the first failing step and its
    /// error. No step after a failure is started.
    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineReport, PipelineFailure> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let span = obs::run_span(&run_id.to_string());
        let outcome = async {
            obs::emit_run_started(&self.config.base_dir, request.repository.as_deref());
            self.run_steps(request).await
        }
        .instrument(span.clone())
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        let _entered = span.enter();

        match outcome {
            Ok(done) => {
                obs::emit_run_finished(duration_ms);
                Ok(PipelineReport {
                    run_id,
                    working_dir: done.working_dir,
                    branch: done.branch,
                    build_command: done.build_command,
                    install_skipped: done.install_skipped,
                    started_at,
                    finished_at: Utc::now(),
                    duration_ms,
                })
            }
            Err(failure) => {
                obs::emit_run_aborted(failure.step, duration_ms, &failure.error);
                Err(failure)
            }
        }
    }

    async fn run_steps(&self, request: &PipelineRequest) -> Result<Completed, PipelineFailure> {
        let working_dir = self.step(Step::Acquire, self.acquire(request)).await?;

        let listing = self
            .step(
                Step::DiscoverBranches,
                branch::list_branches(self.runner.as_ref(), &working_dir),
            )
            .await?;

        let branch = self
            .step(
                Step::SelectBranch,
                branch::select_branch(self.prompter.as_ref(), &listing),
            )
            .await?;

        self.step(Step::Checkout, self.checkout(&working_dir, &branch))
            .await?;

        let install_skipped = self.step(Step::Install, self.install(&working_dir)).await?;

        let scripts = self
            .step(Step::DiscoverScripts, manifest::read_scripts(&working_dir))
            .await?;

        let script = self
            .step(
                Step::SelectScript,
                manifest::select_script(self.prompter.as_ref(), &scripts),
            )
            .await?;

        let build_command = self.config.script_command(&script);
        self.step(Step::Build, self.build(&working_dir, &build_command))
            .await?;

        Ok(Completed {
            working_dir,
            branch,
            build_command,
            install_skipped,
        })
    }

    /// Run one step, attributing any error to it.
    async fn step<T, F>(&self, step: Step, work: F) -> Result<T, PipelineFailure>
    where
        F: Future<Output = Result<T, StepError>>,
    {
        obs::emit_step_started(step);
        let value = work
            .await
            .map_err(|error| PipelineFailure::new(step, error))?;
        obs::emit_step_finished(step);
        Ok(value)
    }

    /// Run a command with the progress cue, mapping failure to `context`.
    async fn run_tracked(
        &self,
        step: Step,
        description: &str,
        invocation: CommandInvocation,
        context: String,
    ) -> Result<String, StepError> {
        let label = step.label(description);
        progress::track(
            self.progress.as_ref(),
            self.reporter.as_ref(),
            &label,
            self.runner.run(&invocation),
        )
        .await
        .into_result()
        .map_err(|diagnostic| StepError::CommandFailed {
            context,
            diagnostic,
        })
    }

    async fn acquire(&self, request: &PipelineRequest) -> Result<PathBuf, StepError> {
        let base_dir = self.config.base_dir.clone();

        let locator = match &request.repository {
            Some(raw) => RepositoryLocator::parse(raw)?,
            None => {
                debug!(dir = %base_dir.display(), "No repository given, building in place");
                return Ok(base_dir);
            }
        };

        if request.skip_clone {
            ensure_inside(&base_dir, locator.name()).await?;
            return Ok(base_dir);
        }

        self.run_tracked(
            Step::Acquire,
            &format!("clone {}", locator),
            CommandInvocation::new(git::clone_command(&locator), &base_dir),
            format!("the repository {} can not be cloned", locator),
        )
        .await?;

        Ok(base_dir.join(locator.name()))
    }

    async fn checkout(&self, dir: &Path, branch: &str) -> Result<(), StepError> {
        self.run_tracked(
            Step::Checkout,
            &format!("checkout {}", branch),
            CommandInvocation::new(git::checkout_command(branch), dir),
            format!("checkout branch {} failed", branch),
        )
        .await?;
        Ok(())
    }

    /// Returns whether the install was skipped.
    async fn install(&self, dir: &Path) -> Result<bool, StepError> {
        let command = self.config.install_command();

        let skipped = match self.config.install_policy {
            InstallPolicy::Run => false,
            InstallPolicy::Skip => true,
            InstallPolicy::Ask => {
                let question = self.config.skip_message.clone().unwrap_or_else(|| {
                    format!("is skip {} ?", Step::Install.label(&command))
                });
                skip::should_skip(self.prompter.as_ref(), Some(&question)).await?
            }
        };

        if skipped {
            self.reporter
                .info(&format!("{} -> skipped", Step::Install.label(&command)));
            return Ok(true);
        }

        self.run_tracked(
            Step::Install,
            &command,
            CommandInvocation::new(command.clone(), dir),
            format!("{} failed", command),
        )
        .await?;
        Ok(false)
    }

    async fn build(&self, dir: &Path, command: &str) -> Result<(), StepError> {
        self.run_tracked(
            Step::Build,
            command,
            CommandInvocation::new(command, dir),
            format!("{} failed", command),
        )
        .await?;
        Ok(())
    }
}

struct Completed {
    working_dir: PathBuf,
    branch: String,
    build_command: String,
    install_skipped: bool,
}

/// Check that `dir` is named `expected`.
async fn ensure_inside(dir: &Path, expected: &str) -> Result<(), StepError> {
    let resolved = match tokio::fs::canonicalize(dir).await {
        Ok(path) => path,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Cannot canonicalize, comparing raw path");
            dir.to_path_buf()
        }
    };
    let actual = resolved
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    if actual != expected {
        return Err(StepError::Precondition {
            expected: expected.to_string(),
            actual: resolved.display().to_string(),
        });
    }
    Ok(())
}
