use storefront_auth::{Denial, SessionError};
use storefront_core::DomainError;
use thiserror::Error;

/// Everything a storefront call can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered 401. The session has already been torn down by
    /// the time the caller sees this.
    #[error("unauthorized: the session has ended")]
    Unauthorized { body: String },

    /// No response at all (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A success response whose body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Rejected before sending (pre-submit checks).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The access gate refused the action.
    #[error(transparent)]
    Denied(#[from] Denial),
}

impl ClientError {
    /// HTTP status, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, when a response arrived.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { body } | ClientError::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }
}
