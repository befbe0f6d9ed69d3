//! pickbuild core - interactive build pipeline
//!
//! Provides a sequential pipeline orchestrator that:
//! - Clones a repository, or checks the operator is already inside it
//! - Lets the operator pick a remote branch and checks it out
//! - Optionally installs dependencies
//! - Lets the operator pick a `package.json` script and runs it
//!
//! External commands, prompts, progress output and operator messages are all
//! behind traits so the orchestrator can be driven by the fakes in [`fakes`].

pub mod branch;
pub mod config;
pub mod error;
pub mod fakes;
pub mod git;
pub mod manifest;
pub mod obs;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod reporter;
pub mod repository;
pub mod runner;
pub mod skip;
pub mod step;
pub mod telemetry;

// Re-export key types
pub use config::{InstallPolicy, PipelineConfig};
pub use error::{PipelineFailure, PromptError, StepError};
pub use manifest::ScriptEntry;
pub use pipeline::{BuildPipeline, PipelineReport, PipelineRequest};
pub use progress::{ProgressIndicator, SilentProgress, Spinner};
pub use prompt::{Choice, Prompter, TerminalPrompter};
pub use reporter::{ConsoleReporter, Reporter, SilentReporter};
pub use repository::RepositoryLocator;
pub use runner::{CommandInvocation, ProcessRunner, ShellRunner, StepResult};
pub use step::Step;
pub use telemetry::init_tracing;
