use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("unknown app screen: {0}")]
    UnknownScreen(String),
}
