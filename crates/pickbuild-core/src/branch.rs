//! Remote branch listing and selection.

use crate::error::StepError;
use crate::git::LIST_REMOTE_BRANCHES;
use crate::prompt::{Choice, Prompter};
use crate::runner::{CommandInvocation, ProcessRunner};
use std::path::Path;

/// Prompt message for the branch choice.
pub const SELECT_BRANCH_MESSAGE: &str = "choose your branch";

/// Run `git branch -r` in `dir` and return its raw output.
pub async fn list_branches(runner: &dyn ProcessRunner, dir: &Path) -> Result<String, StepError> {
    let invocation = CommandInvocation::new(LIST_REMOTE_BRANCHES, dir);
    runner
        .run(&invocation)
        .await
        .into_result()
        .map_err(|diagnostic| StepError::CommandFailed {
            context: format!("cannot list remote branches of {}", dir.display()),
            diagnostic,
        })
}

/// Turn `git branch -r` output into choices.
///
/// Lines are trimmed; blank lines and the symbolic `<remote>/HEAD -> ...`
/// entry are dropped. Label and value are both the branch name.
pub fn branch_choices(listing: &str) -> Vec<Choice> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_symbolic_head(line))
        .map(Choice::plain)
        .collect()
}

fn is_symbolic_head(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map_or(false, |name| name == "HEAD" || name.ends_with("/HEAD"))
}

/// Let the operator pick one branch out of `listing`.
pub async fn select_branch(prompter: &dyn Prompter, listing: &str) -> Result<String, StepError> {
    let choices = branch_choices(listing);
    if choices.is_empty() {
        return Err(StepError::EmptyChoiceSet {
            what: "remote branches",
        });
    }

    Ok(prompter.select(SELECT_BRANCH_MESSAGE, &choices).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptError;
    use crate::fakes::{ScriptedPrompter, ScriptedRunner};
    use crate::runner::StepResult;

    const LISTING: &str = "  origin/HEAD -> origin/main\n  origin/main\n  origin/dev\n";

    fn values(choices: &[Choice]) -> Vec<&str> {
        choices.iter().map(|c| c.value.as_str()).collect()
    }

    #[test]
    fn test_head_entry_is_never_offered() {
        let choices = branch_choices(LISTING);
        assert_eq!(values(&choices), vec!["origin/main", "origin/dev"]);
        assert!(choices.iter().all(|c| c.label == c.value));
    }

    #[test]
    fn test_blank_lines_dropped() {
        let choices = branch_choices("\n\n  origin/a  \n \t \n  upstream/b\n\n");
        assert_eq!(values(&choices), vec!["origin/a", "upstream/b"]);
    }

    #[test]
    fn test_other_remote_head_dropped() {
        let choices = branch_choices("  upstream/HEAD -> upstream/main\n  upstream/main\n");
        assert_eq!(values(&choices), vec!["upstream/main"]);
    }

    #[test]
    fn test_branch_merely_containing_head_kept() {
        let choices = branch_choices("  origin/HEADLESS-ui\n  origin/feature/HEAD-fix\n");
        assert_eq!(values(&choices), vec!["origin/HEADLESS-ui", "origin/feature/HEAD-fix"]);
    }

    #[tokio::test]
    async fn test_selection_echoes_chosen_line() {
        let listing = "  origin/HEAD -> origin/main\n  origin/main\n  origin/release/1.2 \n";
        for expected in ["origin/main", "origin/release/1.2"] {
            let prompter = ScriptedPrompter::new().answer_select(expected);
            let chosen = select_branch(&prompter, listing).await.unwrap();
            assert_eq!(chosen, expected);
            assert!(listing.lines().map(str::trim).any(|line| line == chosen));
        }
    }

    #[tokio::test]
    async fn test_presents_filtered_choices() {
        let prompter = ScriptedPrompter::new().answer_select("origin/dev");
        select_branch(&prompter, LISTING).await.unwrap();

        let presented = prompter.presented();
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].0, SELECT_BRANCH_MESSAGE);
        assert_eq!(values(&presented[0].1), vec!["origin/main", "origin/dev"]);
    }

    #[tokio::test]
    async fn test_empty_listing_fails_without_prompting() {
        let prompter = ScriptedPrompter::new().answer_select("origin/main");
        let err = select_branch(&prompter, "  origin/HEAD -> origin/main\n\n")
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::EmptyChoiceSet { .. }));
        assert!(prompter.presented().is_empty());
    }

    #[tokio::test]
    async fn test_closed_input_is_prompt_failure() {
        let prompter = ScriptedPrompter::new();
        let err = select_branch(&prompter, LISTING).await.unwrap_err();
        assert!(matches!(err, StepError::Prompt(PromptError::InputClosed)));
    }

    #[tokio::test]
    async fn test_list_failure_names_directory() {
        let runner = ScriptedRunner::new().respond(
            LIST_REMOTE_BRANCHES,
            StepResult::Failure("fatal: not a git repository".to_string()),
        );

        let err = list_branches(&runner, Path::new("myapp")).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("myapp"), "got: {msg}");
        assert!(msg.contains("not a git repository"), "got: {msg}");
    }

    #[tokio::test]
    async fn test_list_runs_in_directory() {
        let runner = ScriptedRunner::new()
            .respond(LIST_REMOTE_BRANCHES, StepResult::Success(LISTING.to_string()));

        let listing = list_branches(&runner, Path::new("myapp")).await.unwrap();
        assert_eq!(listing, LISTING);
        assert_eq!(
            runner.invocations(),
            vec![CommandInvocation::new(LIST_REMOTE_BRANCHES, "myapp")]
        );
    }
}
