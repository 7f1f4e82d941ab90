use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::assistant::Assistant;
use crate::core::prompt::{TemplateError, TemplateStore};
use crate::providers::GeminiCli;

/// Read-only snapshot shared by every tool invocation.
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<ServerConfig>,
    pub templates: Arc<TemplateStore>,
    pub assistant: Arc<dyn Assistant>,
}

impl ToolContext {
    #[must_use]
    pub fn new(
        config: ServerConfig,
        templates: TemplateStore,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            templates: Arc::new(templates),
            assistant,
        }
    }

    /// Built-in (plus configured) templates and the Gemini CLI client.
    pub fn from_config(config: ServerConfig) -> Result<Self, TemplateError> {
        let templates = match &config.templates_dir {
            Some(dir) => TemplateStore::with_overrides(dir)?,
            None => TemplateStore::with_defaults(),
        };
        let assistant = Arc::new(GeminiCli::new(config.gemini.clone()));
        Ok(Self::new(config, templates, assistant))
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("server", &self.config.name)
            .field("templates", &self.templates.names())
            .field("assistant", &self.assistant.name())
            .field("model", &self.assistant.model())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockAssistant;
    use std::path::PathBuf;

    #[test]
    fn test_from_config_defaults() {
        let ctx = ToolContext::from_config(ServerConfig::default()).unwrap();
        assert_eq!(ctx.templates.len(), 4);
        assert_eq!(ctx.assistant.name(), "gemini-cli");
        assert_eq!(ctx.assistant.model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_from_config_bad_templates_dir() {
        let config = ServerConfig {
            templates_dir: Some(PathBuf::from("/nonexistent/templates")),
            ..ServerConfig::default()
        };
        assert!(ToolContext::from_config(config).is_err());
    }

    #[test]
    fn test_debug_lists_templates() {
        let ctx = ToolContext::new(
            ServerConfig::default(),
            TemplateStore::with_defaults(),
            Arc::new(MockAssistant::new()),
        );
        let debug = format!("{ctx:?}");
        assert!(debug.contains("code_review"));
        assert!(debug.contains("mock"));
    }
}
