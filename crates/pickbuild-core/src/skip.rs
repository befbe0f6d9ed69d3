//! Yes/no confirmation for bypassing an optional step.

use crate::error::StepError;
use crate::prompt::Prompter;

pub const DEFAULT_SKIP_MESSAGE: &str = "is skip this step ?";

/// Ask whether to skip the next step. Default answer is "no".
pub async fn should_skip(prompter: &dyn Prompter, message: Option<&str>) -> Result<bool, StepError> {
    let message = message.unwrap_or(DEFAULT_SKIP_MESSAGE);
    Ok(prompter.confirm(message, false).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptError;
    use crate::fakes::ScriptedPrompter;

    #[tokio::test]
    async fn test_uses_default_message() {
        let prompter = ScriptedPrompter::new().answer_confirm(true);
        assert!(should_skip(&prompter, None).await.unwrap());
        assert_eq!(
            prompter.confirmations(),
            vec![(DEFAULT_SKIP_MESSAGE.to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_custom_message_and_no() {
        let prompter = ScriptedPrompter::new().answer_confirm(false);
        let skip = should_skip(&prompter, Some("is skip step5: npm install ?"))
            .await
            .unwrap();
        assert!(!skip);
        assert_eq!(prompter.confirmations()[0].0, "is skip step5: npm install ?");
    }

    #[tokio::test]
    async fn test_closed_input() {
        let prompter = ScriptedPrompter::new();
        let err = should_skip(&prompter, None).await.unwrap_err();
        assert!(matches!(err, StepError::Prompt(PromptError::InputClosed)));
    }
}
