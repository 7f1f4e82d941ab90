mod options;

pub use options::{DEFAULT_BINARY, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GeminiOptions};

use async_trait::async_trait;
use regex::Regex;
use std::process::{Output, Stdio};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::error::AssistantError;
use crate::core::assistant::{Assistant, AssistantResponse, compose_prompt};

const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const AUTH_PROBE_PROMPT: &str = "Say hello";

static ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid regex"));

fn strip_ansi_codes(s: &str) -> String {
    ANSI_REGEX.replace_all(s, "").into_owned()
}

/// Drives the Gemini command-line tool as a one-shot subprocess per call.
#[derive(Debug, Clone)]
pub struct GeminiCli {
    options: GeminiOptions,
    timeout: Duration,
}

impl GeminiCli {
    #[must_use]
    pub const fn new(options: GeminiOptions) -> Self {
        let timeout = Duration::from_secs(options.timeout_secs);
        Self { options, timeout }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &GeminiOptions {
        &self.options
    }

    fn launch_error(&self, err: std::io::Error) -> AssistantError {
        if err.kind() == std::io::ErrorKind::NotFound {
            AssistantError::NotFound {
                binary: self.options.binary.clone(),
            }
        } else {
            AssistantError::Spawn(err.to_string())
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.options.binary);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn finish(output: &Output) -> Result<String, AssistantError> {
        if output.status.success() {
            Ok(strip_ansi_codes(&String::from_utf8_lossy(&output.stdout))
                .trim()
                .to_string())
        } else {
            Err(AssistantError::Exit {
                code: output.status.code(),
                stderr: strip_ansi_codes(&String::from_utf8_lossy(&output.stderr)),
            })
        }
    }

    /// Pipes `prompt` into a fresh process and returns its trimmed stdout.
    ///
    /// The child is killed if the timeout fires or the future is dropped.
    pub async fn run(&self, prompt: &str) -> Result<String, AssistantError> {
        let args = self.options.to_args();
        tracing::debug!(binary = %self.options.binary, ?args, "Launching Gemini CLI");

        let mut child = self
            .command(&args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AssistantError::Spawn("Failed to open stdin".to_string()))?;
        let input = prompt.as_bytes().to_vec();
        let feed = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };

        let result = timeout(self.timeout, async {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            if let Err(e) = fed {
                tracing::debug!("Gemini CLI did not consume the whole prompt: {}", e);
            }
            output
        })
        .await;

        match result {
            Ok(output) => Self::finish(&output?),
            Err(_) => Err(AssistantError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl Assistant for GeminiCli {
    fn name(&self) -> &'static str {
        "gemini-cli"
    }

    fn model(&self) -> &str {
        &self.options.model
    }

    async fn call(&self, system_prompt: &str, user_prompt: &str) -> AssistantResponse {
        let prompt = compose_prompt(system_prompt, user_prompt);
        tracing::debug!("Gemini prompt ({} chars)", prompt.len());

        match self.run(&prompt).await {
            Ok(content) => {
                tracing::info!("Gemini CLI returned {} chars", content.len());
                AssistantResponse::success(content, prompt)
            }
            Err(e) => {
                tracing::warn!("Gemini CLI call failed: {}", e);
                AssistantResponse::failure(e.detail(), prompt)
            }
        }
    }

    async fn check_available(&self) -> Result<(), AssistantError> {
        let child = self
            .command(&["--version".to_string()])
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        match timeout(VERSION_CHECK_TIMEOUT, child.wait_with_output()).await {
            Ok(output) => Self::finish(&output?).map(|version| {
                tracing::debug!("Gemini CLI version: {}", version);
            }),
            Err(_) => Err(AssistantError::Timeout(VERSION_CHECK_TIMEOUT)),
        }
    }

    async fn verify_authentication(&self) -> bool {
        if let Err(e) = self.check_available().await {
            tracing::debug!("Gemini CLI unavailable: {}", e);
            return false;
        }
        match self.run(AUTH_PROBE_PROMPT).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Gemini authentication check failed: {}", e);
                false
            }
        }
    }
}
