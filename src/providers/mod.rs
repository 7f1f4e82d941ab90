pub mod error;
pub mod gemini;
pub mod mock;

pub use error::AssistantError;
pub use gemini::{GeminiCli, GeminiOptions};
pub use mock::{MockAssistant, MockReply};
