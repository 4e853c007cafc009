use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),
}
