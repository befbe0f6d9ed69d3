//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable selecting the package manager binary.
pub const ENV_PACKAGE_MANAGER: &str = "PICKBUILD_PACKAGE_MANAGER";

/// Environment variable selecting the [`InstallPolicy`].
pub const ENV_INSTALL: &str = "PICKBUILD_INSTALL";

pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";

/// What to do about the dependency-install step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstallPolicy {
    /// Ask the operator whether to skip
    #[default]
    Ask,

    /// Always install
    Run,

    /// Never install
    Skip,
}

impl FromStr for InstallPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(InstallPolicy::Ask),
            "run" => Ok(InstallPolicy::Run),
            "skip" => Ok(InstallPolicy::Skip),
            other => Err(format!(
                "unknown install policy {:?} (expected ask, run or skip)",
                other
            )),
        }
    }
}

impl fmt::Display for InstallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstallPolicy::Ask => "ask",
            InstallPolicy::Run => "run",
            InstallPolicy::Skip => "skip",
        })
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory the clone is created in, or the repository itself when
    /// cloning is skipped.
    pub base_dir: PathBuf,

    /// Package manager binary (`npm`, `cnpm`, `yarn`, `pnpm`, ...).
    pub package_manager: String,

    pub install_policy: InstallPolicy,

    /// Overrides the install skip question.
    pub skip_message: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            install_policy: InstallPolicy::Ask,
            skip_message: None,
        }
    }
}

impl PipelineConfig {
    /// Set the base directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Set the package manager binary
    pub fn with_package_manager(mut self, pm: impl Into<String>) -> Self {
        self.package_manager = pm.into();
        self
    }

    pub fn with_install_policy(mut self, policy: InstallPolicy) -> Self {
        self.install_policy = policy;
        self
    }

    pub fn with_skip_message(mut self, message: impl Into<String>) -> Self {
        self.skip_message = Some(message.into());
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - PICKBUILD_PACKAGE_MANAGER (optional, default: "npm")
    /// - PICKBUILD_INSTALL (optional, default: "ask") - one of ask, run, skip
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(pm) = lookup(ENV_PACKAGE_MANAGER).filter(|v| !v.trim().is_empty()) {
            config.package_manager = pm.trim().to_string();
        }
        if let Some(policy) = lookup(ENV_INSTALL) {
            config.install_policy = policy
                .parse()
                .map_err(|e| format!("{}: {}", ENV_INSTALL, e))?;
        }

        Ok(config)
    }

    /// `<pm> install`
    pub fn install_command(&self) -> String {
        format!("{} install", self.package_manager)
    }

    /// `<pm> <invocation>`, e.g. `npm run build`.
    pub fn script_command(&self, invocation: &str) -> String {
        format!("{} {}", self.package_manager, invocation)
    }
}
