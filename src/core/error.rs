use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Completion request failed: {0}")]
    CompletionRequestFailed(String),

    #[error("Response does not match schema: {0}")]
    ResponseSchemaMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl EngineError {
    /// True for failures of the external completion call, including replies
    /// that arrived but did not fit the expected shape.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            EngineError::CompletionRequestFailed(_) | EngineError::ResponseSchemaMismatch(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
