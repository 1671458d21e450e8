//! Failure taxonomy shared by every layer of the bookstore service.
//!
//! Services raise these at the point of detection; the HTTP layer owns the
//! single translation into the wire envelope.

use thiserror::Error;

/// Result type alias using [`CatalogError`].
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Every failure a catalog operation can surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Query string carried keys outside the recognized search vocabulary.
    #[error("Unknown parameter(s) [{}] found", .0.join(", "))]
    InvalidParameter(Vec<String>),

    /// Sort criteria were malformed or named an unsortable property.
    #[error("{0}")]
    InvalidSort(String),

    /// Page number or page size was out of range or not an integer.
    #[error("{0}")]
    InvalidPagination(String),

    /// Caller-supplied data failed validation; one message per failed rule.
    #[error("{}", .0.join("; "))]
    InvalidInput(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or ownership violation.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Failure raised by the transport before a handler ran (unsupported
    /// method, unreadable body, unknown route).
    #[error("{detail}")]
    Transport { status: u16, detail: String },

    /// An internal invariant was broken. Always fatal for the request.
    #[error("inconsistent data: {0}")]
    InconsistentData(String),
}

impl CatalogError {
    /// Single-message input failure.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn transport(status: u16, detail: impl Into<String>) -> Self {
        Self::Transport {
            status,
            detail: detail.into(),
        }
    }

    /// Human-readable messages for this failure, in the order they were raised.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::InvalidInput(messages) if !messages.is_empty() => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
