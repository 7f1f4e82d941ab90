use thiserror::Error;

use crate::core::prompt::TemplateError;

/// Failures inside a tool pipeline. Each one ends up in a failure envelope
/// rather than propagating to the caller.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} template not found")]
    TemplateMissing(&'static str),

    #[error(transparent)]
    Render(#[from] TemplateError),

    #[error("Gemini call failed: {message}")]
    Assistant {
        message: String,
        input_prompt: String,
    },
}

impl ToolError {
    /// The prompt that had been built when the failure happened, if any.
    #[must_use]
    pub fn input_prompt(&self) -> Option<&str> {
        match self {
            Self::Assistant { input_prompt, .. } => Some(input_prompt),
            Self::TemplateMissing(_) | Self::Render(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::TemplateMissing("Code review").to_string(),
            "Code review template not found"
        );

        let err = ToolError::Assistant {
            message: "quota exceeded".to_string(),
            input_prompt: "System: s\n\nUser: u".to_string(),
        };
        assert_eq!(err.to_string(), "Gemini call failed: quota exceeded");
        assert_eq!(err.input_prompt(), Some("System: s\n\nUser: u"));
    }

    #[test]
    fn test_render_error_has_no_prompt() {
        let err: ToolError = TemplateError::MissingSlot {
            template: "bug_analysis".to_string(),
            slot: "environment".to_string(),
        }
        .into();
        assert!(err.input_prompt().is_none());
        assert!(err.to_string().contains("environment"));
    }
}
