use chorrus_auth::AuthError;
use chorrus_core::CoreError;
use thiserror::Error;

/// Failures of a backend call that are not about the session.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RequestError {
    pub fn status(status: u16, detail: impl Into<String>) -> Self {
        Self::Status {
            status,
            detail: detail.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Error returned by every [`crate::ApiClient`] operation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ClientError {
    /// The backend rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Auth(AuthError::Unauthorized { .. }))
    }

    /// HTTP status of a non-2xx, non-401 response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(RequestError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        Self::Request(RequestError::InvalidInput(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(RequestError::Transport(err))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
