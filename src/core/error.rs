use thiserror::Error;

use super::prompt::TemplateError;
use crate::providers::error::AssistantError;
use crate::server::ServerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input for {tool}: {reason}")]
    InvalidToolInput { tool: String, reason: String },

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
