//! package.json build scripts and their selection.

use crate::error::StepError;
use crate::prompt::{Choice, Prompter};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Manifest file name at the working directory root.
pub const MANIFEST_FILE: &str = "package.json";

/// Prompt message for the script choice.
pub const SELECT_SCRIPT_MESSAGE: &str = "choose your build script";

/// One declared script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Key in the `scripts` object.
    pub name: String,

    /// Shell command the script declares (informational).
    pub command: String,
}

impl ScriptEntry {
    /// Package-manager arguments that run this script, e.g. `run build`.
    ///
    /// The name is shell-quoted, so `build prod` stays one argument.
    pub fn invocation(&self) -> String {
        format!("run {}", shell_words::quote(&self.name))
    }

    pub fn choice(&self) -> Choice {
        Choice::new(self.name.clone(), self.invocation())
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    scripts: Option<Map<String, Value>>,
}

/// Parse the `scripts` object of a package.json document, in declaration order.
pub fn parse_scripts(text: &str) -> Result<Vec<ScriptEntry>, String> {
    // npm accepts a leading byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let manifest: Manifest = serde_json::from_str(text).map_err(|e| e.to_string())?;

    manifest
        .scripts
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(command) => Ok(ScriptEntry { name, command }),
            other => Err(format!("script {:?} is not a string: {}", name, other)),
        })
        .collect()
}

/// Read the scripts declared by `<dir>/package.json`.
pub async fn read_scripts(dir: &Path) -> Result<Vec<ScriptEntry>, StepError> {
    let path = dir.join(MANIFEST_FILE);
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| StepError::ManifestRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    parse_scripts(&text).map_err(|reason| StepError::ManifestRead { path, reason })
}

/// Let the operator pick a script; resolves to its invocation (`run <name>`).
pub async fn select_script(
    prompter: &dyn Prompter,
    scripts: &[ScriptEntry],
) -> Result<String, StepError> {
    if scripts.is_empty() {
        return Err(StepError::EmptyChoiceSet {
            what: "build scripts",
        });
    }

    let choices: Vec<Choice> = scripts.iter().map(ScriptEntry::choice).collect();
    Ok(prompter.select(SELECT_SCRIPT_MESSAGE, &choices).await?)
}
