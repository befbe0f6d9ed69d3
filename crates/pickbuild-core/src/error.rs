//! Error types for pipeline steps.

use crate::step::Step;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an interactive prompt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    /// Standard input reached end of file before an answer was given
    #[error("input stream closed before an answer was given")]
    InputClosed,

    /// Reading or writing the terminal failed
    #[error("failed to read input: {0}")]
    Io(String),

    /// A select prompt was asked to present nothing
    #[error("no choices to present")]
    NoChoices,
}

/// Errors that abort a single pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    /// git or the package manager exited non-zero (or could not be spawned)
    #[error("{context}: {diagnostic}")]
    CommandFailed { context: String, diagnostic: String },

    /// Cloning was skipped but the current directory is not the repository
    #[error("please make sure your location is in {expected} (current directory is {actual}); cd into it first")]
    Precondition { expected: String, actual: String },

    /// package.json is missing or cannot be parsed
    #[error("cannot read manifest {path}: {reason}", path = .path.display())]
    ManifestRead { path: PathBuf, reason: String },

    /// The interactive prompt failed
    #[error("prompt failed: {0}")]
    Prompt(#[from] PromptError),

    /// A listing produced nothing to choose from
    #[error("no {what} to choose from")]
    EmptyChoiceSet { what: &'static str },

    /// The repository locator has no usable name component
    #[error("cannot derive a repository name from {0:?}")]
    InvalidRepository(String),
}

/// Terminal state of an aborted pipeline: the first failing step and why.
#[derive(Error, Debug)]
#[error("step{} ({}) failed: {}", .step.number(), .step.name(), .error)]
pub struct PipelineFailure {
    pub step: Step,
    pub error: StepError,
}

impl PipelineFailure {
    pub fn new(step: Step, error: StepError) -> Self {
        Self { step, error }
    }
}
