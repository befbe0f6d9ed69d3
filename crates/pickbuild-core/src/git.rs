//! git command lines used by the pipeline.
//!
//! Only the command text is built here; execution goes through a
//! [`ProcessRunner`](crate::runner::ProcessRunner).

use crate::repository::RepositoryLocator;

/// Lists remote-tracking branches, one per line.
pub const LIST_REMOTE_BRANCHES: &str = "git branch -r";

/// `git clone <locator>`, run in the parent directory of the clone.
pub fn clone_command(locator: &RepositoryLocator) -> String {
    format!("git clone {}", shell_words::quote(locator.as_str()))
}

/// `git checkout <branch>`.
pub fn checkout_command(branch: &str) -> String {
    format!("git checkout {}", shell_words::quote(branch))
}
