//! Client error types.

use thiserror::Error;

/// Failures talking to the portfolio API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Short message suitable for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the server.".to_string(),
            Self::Status { status, .. } if *status >= 500 => {
                "The server could not load this content.".to_string()
            }
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}
