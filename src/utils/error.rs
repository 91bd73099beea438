use crate::domain::model::ApiVersion;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Swarm request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    #[error("Connection to Swarm failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Failed to decode Swarm response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{feature} requires API v{required}+, client is configured for v{actual}")]
    Unsupported {
        feature: String,
        required: ApiVersion,
        actual: ApiVersion,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid Swarm URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwarmError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SwarmError::InvalidArgument {
            message: message.into(),
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            SwarmError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of a rejected request.
    pub fn body(&self) -> Option<&str> {
        match self {
            SwarmError::Request { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, SwarmError::Connection(_))
    }
}

pub type Result<T> = std::result::Result<T, SwarmError>;
