//! Error types for the game client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login was rejected by the server
    #[error("Login rejected ({code}): {msg}")]
    LoginRejected { code: String, msg: String },

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
