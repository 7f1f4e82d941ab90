use serde::{Deserialize, Serialize};

pub const DEFAULT_BINARY: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiOptions {
    /// Program name or path of the Gemini CLI.
    pub binary: String,
    pub model: String,
    pub sandbox: bool,
    pub debug: bool,
    pub all_files: bool,
    pub timeout_secs: u64,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            sandbox: false,
            debug: false,
            all_files: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeminiOptions {
    /// Command-line arguments passed before the prompt is piped in.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--model".to_string(), self.model.clone()];
        if self.sandbox {
            args.push("--sandbox".to_string());
        }
        if self.debug {
            args.push("--debug".to_string());
        }
        if self.all_files {
            args.push("--all-files".to_string());
        }
        args
    }
}
