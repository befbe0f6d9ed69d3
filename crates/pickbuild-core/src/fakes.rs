//! In-memory fakes for the pipeline collaborators (testing only)
//!
//! Provides `ScriptedRunner`, `ScriptedPrompter`, `RecordingReporter` and
//! `RecordingProgress`, which satisfy the trait contracts without spawning
//! processes or touching the terminal, and record how they were called.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::PromptError;
use crate::progress::ProgressIndicator;
use crate::prompt::{Choice, Prompter};
use crate::reporter::Reporter;
use crate::runner::{CommandInvocation, ProcessRunner, StepResult};

/// Poisoned locks still hand back what was recorded.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

/// Process runner answering from a table of command prefixes.
///
/// The first registered prefix that matches wins; unmatched commands succeed
/// with empty output. Every invocation is recorded.
#[derive(Debug)]
pub struct ScriptedRunner {
    responses: Vec<(String, StepResult)>,
    fallback: StepResult,
    invocations: Mutex<Vec<CommandInvocation>>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            responses: Vec::new(),
            fallback: StepResult::Success(String::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `result`.
    pub fn respond(mut self, prefix: &str, result: StepResult) -> Self {
        self.responses.push((prefix.to_string(), result));
        self
    }

    /// All invocations, in order.
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        lock(&self.invocations).clone()
    }

    /// Command texts of all invocations, in order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(|i| i.command().to_string())
            .collect()
    }

    /// Whether any command starting with `prefix` was run.
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &CommandInvocation) -> StepResult {
        lock(&self.invocations).push(invocation.clone());
        self.responses
            .iter()
            .find(|(prefix, _)| invocation.command().starts_with(prefix.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ---------------------------------------------------------------------------
// ScriptedPrompter
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Answer {
    Select(String),
    Confirm(bool),
    Fail(PromptError),
}

/// Prompter answering from a queue.
///
/// A queued select answer must be one of the presented values. An exhausted
/// queue behaves like a closed input stream.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    presented: Mutex<Vec<(String, Vec<Choice>)>>,
    confirmations: Mutex<Vec<(String, bool)>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a select answer (the chosen value).
    pub fn answer_select(self, value: &str) -> Self {
        self.push(Answer::Select(value.to_string()))
    }

    /// Queue a confirm answer.
    pub fn answer_confirm(self, yes: bool) -> Self {
        self.push(Answer::Confirm(yes))
    }

    /// Queue a failure for the next prompt of either kind.
    pub fn fail(self, error: PromptError) -> Self {
        self.push(Answer::Fail(error))
    }

    fn push(self, answer: Answer) -> Self {
        lock(&self.answers).push_back(answer);
        self
    }

    fn next(&self) -> Option<Answer> {
        lock(&self.answers).pop_front()
    }

    /// Every select prompt shown: (message, choices).
    pub fn presented(&self) -> Vec<(String, Vec<Choice>)> {
        lock(&self.presented).clone()
    }

    /// Every confirm prompt shown: (message, default).
    pub fn confirmations(&self) -> Vec<(String, bool)> {
        lock(&self.confirmations).clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn select(&self, message: &str, choices: &[Choice]) -> Result<String, PromptError> {
        lock(&self.presented).push((message.to_string(), choices.to_vec()));

        match self.next() {
            Some(Answer::Select(value)) if choices.iter().any(|c| c.value == value) => Ok(value),
            Some(Answer::Select(value)) => {
                Err(PromptError::Io(format!("scripted answer {:?} was not offered", value)))
            }
            Some(Answer::Confirm(_)) => Err(PromptError::Io(
                "expected a confirm prompt, got a select prompt".to_string(),
            )),
            Some(Answer::Fail(error)) => Err(error),
            None => Err(PromptError::InputClosed),
        }
    }

    async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        lock(&self.confirmations).push((message.to_string(), default));

        match self.next() {
            Some(Answer::Confirm(yes)) => Ok(yes),
            Some(Answer::Select(_)) => Err(PromptError::Io(
                "expected a select prompt, got a confirm prompt".to_string(),
            )),
            Some(Answer::Fail(error)) => Err(error),
            None => Err(PromptError::InputClosed),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingReporter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warn,
    Error,
}

/// Reporter keeping every message in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(ReportLevel, String)> {
        lock(&self.messages).clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.at(ReportLevel::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(ReportLevel::Error)
    }

    fn at(&self, level: ReportLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: ReportLevel, message: &str) {
        lock(&self.messages).push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.record(ReportLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(ReportLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(ReportLevel::Error, message);
    }
}

// ---------------------------------------------------------------------------
// RecordingProgress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start(String),
    Stop,
}

/// Progress indicator recording start/stop calls.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        lock(&self.events).clone()
    }

    /// Labels passed to `start`, in order.
    pub fn labels(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Start(label) => Some(label),
                ProgressEvent::Stop => None,
            })
            .collect()
    }
}

impl ProgressIndicator for RecordingProgress {
    fn start(&self, label: &str) {
        lock(&self.events).push(ProgressEvent::Start(label.to_string()));
    }

    fn stop(&self) {
        lock(&self.events).push(ProgressEvent::Stop);
    }
}
