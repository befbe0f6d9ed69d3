//! Interactive single-select and yes/no prompts.

use crate::error::PromptError;
use async_trait::async_trait;
use std::io::{self, BufRead, Write};

/// One selectable entry of a list prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Choice whose label and value are the same text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: text,
        }
    }
}

/// Source of operator answers.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Present `choices` and resolve to the chosen value.
    async fn select(&self, message: &str, choices: &[Choice]) -> Result<String, PromptError>;

    /// Ask a yes/no question; an empty answer means `default`.
    async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;
}

/// Prompts on stderr and reads answers from stdin.
///
/// Invalid answers re-prompt; end of input is [`PromptError::InputClosed`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    async fn ask(question: String) -> Result<String, PromptError> {
        tokio::task::spawn_blocking(move || {
            eprint!("{}", question);
            io::stderr().flush().ok();

            let mut line = String::new();
            let read = io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|e| PromptError::Io(e.to_string()))?;
            if read == 0 {
                return Err(PromptError::InputClosed);
            }
            Ok(line.trim().to_string())
        })
        .await
        .map_err(|e| PromptError::Io(e.to_string()))?
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn select(&self, message: &str, choices: &[Choice]) -> Result<String, PromptError> {
        if choices.is_empty() {
            return Err(PromptError::NoChoices);
        }

        eprintln!("{}", message);
        for (i, choice) in choices.iter().enumerate() {
            eprintln!("  [{}] {}", i + 1, choice.label);
        }

        loop {
            let answer = Self::ask(format!("Enter choice (1-{}): ", choices.len())).await?;
            if let Some(choice) = pick(choices, &answer) {
                return Ok(choice.value.clone());
            }
            eprintln!("invalid choice: {:?}", answer);
        }
    }

    async fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = Self::ask(format!("{} {}: ", message, suffix)).await?;
            if let Some(yes) = parse_yes_no(&answer, default) {
                return Ok(yes);
            }
            eprintln!("please answer y or n");
        }
    }
}

/// Resolve an answer given as a 1-based number or as an exact label.
fn pick<'a>(choices: &'a [Choice], answer: &str) -> Option<&'a Choice> {
    match answer.parse::<usize>() {
        Ok(n) if n >= 1 => choices.get(n - 1),
        Ok(_) => None,
        Err(_) => choices.iter().find(|c| c.label == answer),
    }
}

fn parse_yes_no(answer: &str, default: bool) -> Option<bool> {
    match answer.to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
