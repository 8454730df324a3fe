use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
    #[error("JSON parsing error: {0}")]
    Json(String),
    #[error("Node RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Unexpected node response: {0}")]
    UnexpectedResponse(String),
    #[error("Entry point name must be ASCII: {0}")]
    InvalidSelectorName(String),
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Json(e.to_string())
    }
}
