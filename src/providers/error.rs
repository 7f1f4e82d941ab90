use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Gemini CLI not found: '{binary}' is not installed or not on PATH")]
    NotFound { binary: String },

    #[error("Failed to launch assistant: {0}")]
    Spawn(String),

    #[error("Assistant exited unsuccessfully: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("Assistant timed out after {0:?}")]
    Timeout(Duration),

    #[error("Assistant I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("status {c}"))
}

impl AssistantError {
    /// Text reported to callers in `AssistantResponse::error`.
    ///
    /// A non-zero exit surfaces the process's stderr when it wrote any.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Exit { code, stderr } if stderr.trim().is_empty() => {
                format!("Gemini CLI exited with {}", exit_label(*code))
            }
            Self::Exit { stderr, .. } => stderr.trim().to_string(),
            other => other.to_string(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
