//! Client error model.

use thiserror::Error;

use stockmaster_core::DomainError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Generic message used when neither the backend nor the transport says more.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, refused, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The action needs a signed-in user and there is none.
    #[error("no active session")]
    NoSession,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// The backend's own message when it sent one, verbatim; otherwise
    /// `fallback`. Local validation failures keep their own wording.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            ClientError::Domain(DomainError::Validation(msg)) => msg.clone(),
            ClientError::NoSession => "Your session has ended. Please log in again.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
