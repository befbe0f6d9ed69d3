//! Pipeline step definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// git clone, or check the operator is inside the repository
    Acquire,

    /// git branch -r
    DiscoverBranches,

    /// Operator picks a remote branch
    SelectBranch,

    /// git checkout <branch>
    Checkout,

    /// <pm> install, unless skipped
    Install,

    /// Read package.json scripts
    DiscoverScripts,

    /// Operator picks a script
    SelectScript,

    /// <pm> run <script>
    Build,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 8] = [
        Step::Acquire,
        Step::DiscoverBranches,
        Step::SelectBranch,
        Step::Checkout,
        Step::Install,
        Step::DiscoverScripts,
        Step::SelectScript,
        Step::Build,
    ];

    /// 1-based position in the pipeline.
    pub fn number(&self) -> u8 {
        match self {
            Step::Acquire => 1,
            Step::DiscoverBranches => 2,
            Step::SelectBranch => 3,
            Step::Checkout => 4,
            Step::Install => 5,
            Step::DiscoverScripts => 6,
            Step::SelectScript => 7,
            Step::Build => 8,
        }
    }

    /// Get the step name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Acquire => "acquire",
            Step::DiscoverBranches => "discover_branches",
            Step::SelectBranch => "select_branch",
            Step::Checkout => "checkout",
            Step::Install => "install",
            Step::DiscoverScripts => "discover_scripts",
            Step::SelectScript => "select_script",
            Step::Build => "build",
        }
    }

    /// Operator-facing label, e.g. `step4: checkout origin/dev`.
    pub fn label(&self, description: &str) -> String {
        format!("step{}: {}", self.number(), description)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
