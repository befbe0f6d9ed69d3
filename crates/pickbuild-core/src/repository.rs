//! Repository locator parsing.

use crate::error::StepError;
use std::fmt;
use std::str::FromStr;

/// A `git clone` source and the directory name the clone produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    raw: String,
    name: String,
}

impl RepositoryLocator {
    /// Parse a locator such as `git@host:org/myapp.git`,
    /// `https://host/org/myapp` or `/srv/git/myapp.git`.
    ///
    /// The name is the last path component with any `.git` suffix removed.
    /// A trailing `/.git` component is dropped first, as `git clone` does.
    pub fn parse(raw: &str) -> Result<Self, StepError> {
        let trimmed = raw.trim();
        let path = trimmed.trim_end_matches(&['/', '\\'][..]);
        let path = path
            .strip_suffix("/.git")
            .or_else(|| path.strip_suffix("\\.git"))
            .map(|parent| parent.trim_end_matches(&['/', '\\'][..]))
            .unwrap_or(path);
        let last = path
            .rsplit(&['/', '\\', ':'][..])
            .next()
            .unwrap_or_default();
        let name = last.strip_suffix(".git").unwrap_or(last);

        if name.is_empty() || name == "." || name == ".." {
            return Err(StepError::InvalidRepository(raw.to_string()));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            name: name.to_string(),
        })
    }

    /// The locator as given (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Directory name a clone of this locator produces.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepositoryLocator {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssh_locator() {
        let locator = RepositoryLocator::parse("git@host:org/myapp.git").unwrap();
        assert_eq!(locator.name(), "myapp");
        assert_eq!(locator.as_str(), "git@host:org/myapp.git");
    }

    #[test]
    fn test_ssh_locator_without_org() {
        let locator = RepositoryLocator::parse("git@host:myapp.git").unwrap();
        assert_eq!(locator.name(), "myapp");
    }

    #[test]
    fn test_https_locator_without_suffix() {
        let locator: RepositoryLocator = "https://github.com/org/web-console/".parse().unwrap();
        assert_eq!(locator.name(), "web-console");
    }

    #[test]
    fn test_local_path_locator() {
        let locator = RepositoryLocator::parse("/srv/git/myapp.git").unwrap();
        assert_eq!(locator.name(), "myapp");
    }

    #[test]
    fn test_work_tree_git_dir_locator() {
        for raw in ["/srv/myapp/.git", "/srv/myapp/.git/", "file:///srv/myapp/.git"] {
            let locator = RepositoryLocator::parse(raw).unwrap();
            assert_eq!(locator.name(), "myapp", "for {raw:?}");
        }
    }

    #[test]
    fn test_dotted_name_keeps_inner_dots() {
        let locator = RepositoryLocator::parse("git@host:org/my.app.git").unwrap();
        assert_eq!(locator.name(), "my.app");
    }

    #[test]
    fn test_invalid_locators() {
        for raw in ["", "   ", "git@host:", ".git", "https://host/org/..", "/"] {
            assert!(
                matches!(
                    RepositoryLocator::parse(raw),
                    Err(StepError::InvalidRepository(_))
                ),
                "expected {raw:?} to be rejected"
            );
        }
    }
}
