pub mod assistant;
pub mod error;
pub mod interpret;
pub mod prompt;

pub use assistant::{Assistant, AssistantResponse, compose_prompt};
pub use error::{AppError, Result};
