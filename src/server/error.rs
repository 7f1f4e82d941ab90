use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Response writer stopped: {0}")]
    Writer(String),
}
