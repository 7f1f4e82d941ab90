pub mod defaults;
mod store;
mod template;

pub use store::TemplateStore;
pub use template::{PromptTemplate, TemplateError};
