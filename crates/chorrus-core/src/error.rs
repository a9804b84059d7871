use thiserror::Error;

/// Validation errors raised before anything reaches the backend.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidDateTime(String),

    #[error("Invalid invite code: {0}")]
    InvalidInviteCode(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Unknown recurrence interval: {0} (expected daily, weekly or bi-weekly)")]
    InvalidRecurrence(String),

    #[error("Unknown chore filter: {0} (expected all, pending or completed)")]
    InvalidFilter(String),
}

impl CoreError {
    /// Create a new InvalidDate error
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate(message.into())
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(message: impl Into<String>) -> Self {
        Self::InvalidDateTime(message.into())
    }

    pub fn invalid_invite_code(message: impl Into<String>) -> Self {
        Self::InvalidInviteCode(message.into())
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
