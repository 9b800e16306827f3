//! Error taxonomy for storage adapter operations.

use nextbox_contract::{HostError, RawResponse};
use thiserror::Error;

use crate::classify::{error_message, is_expected_status, should_surface_error};
use crate::notifications::SAVE_IS_BLOCKED_TITLE;

/// Failure of a [`NextboxService`](crate::NextboxService) operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NextboxError {
    /// The host has not delivered its state yet.
    #[error("Nextbox initialization error")]
    Uninitialized,
    /// Mutating calls are disabled for the rest of the session.
    #[error("{}", SAVE_IS_BLOCKED_TITLE)]
    SaveBlocked,
    /// The platform answered 403 or 404.
    #[error("{message}")]
    Expected {
        /// HTTP status.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
    /// The platform answered without the expected payload; `message` is the response body.
    #[error("{message}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Response body.
        message: String,
    },
    /// The host SDK or network failed.
    #[error(transparent)]
    Host(HostError),
    /// JSON content was empty.
    #[error("unexpected end of JSON input")]
    EmptyJson,
    /// JSON content could not be parsed.
    #[error("invalid JSON content: {0}")]
    Decode(String),
    /// A payload could not be serialized.
    #[error("failed to serialize payload: {0}")]
    Encode(String),
}

impl From<HostError> for NextboxError {
    fn from(error: HostError) -> Self {
        match error.response() {
            Some(response) if is_expected_status(response) => Self::Expected {
                status: response.status,
                message: if response.body.is_empty() {
                    response.status_text.clone()
                } else {
                    response.body.clone()
                },
            },
            _ => Self::Host(error),
        }
    }
}

impl NextboxError {
    /// Builds an error carrying the response body as its message.
    pub fn from_body(response: &RawResponse) -> Self {
        if is_expected_status(response) {
            Self::Expected {
                status: response.status,
                message: response.body.clone(),
            }
        } else {
            Self::Rejected {
                status: response.status,
                message: response.body.clone(),
            }
        }
    }

    /// Builds an error from a non-ok response to a raw request.
    pub fn from_response(response: RawResponse) -> Self {
        HostError::Response(response).into()
    }

    /// Returns `true` when the failure should be shown to the user.
    pub fn should_surface(&self) -> bool {
        match self {
            Self::Expected { .. } => false,
            Self::Host(error) => should_surface_error(error),
            _ => true,
        }
    }

    /// Returns `true` for 403/404 outcomes.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Expected { .. })
    }

    /// Returns `true` when the save latch rejected the call.
    pub fn is_save_blocked(&self) -> bool {
        matches!(self, Self::SaveBlocked)
    }

    /// HTTP status associated with the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Expected { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::Host(HostError::Response(response)) => Some(response.status),
            _ => None,
        }
    }

    /// Detail line used in toasts: the reason phrase for host responses, the message otherwise.
    pub fn toast_message(&self) -> String {
        match self {
            Self::Host(error) => error_message(error),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_and_missing_host_responses_become_expected() {
        let err = NextboxError::from(HostError::status(404, "no such element"));
        assert_eq!(
            err,
            NextboxError::Expected {
                status: 404,
                message: "no such element".to_string()
            }
        );
        assert!(!err.should_surface());

        let err = NextboxError::from(HostError::status(403, ""));
        assert_eq!(err.to_string(), "Forbidden");
    }

    #[test]
    fn server_errors_and_failures_surface() {
        let err = NextboxError::from(HostError::status(500, "boom"));
        assert!(err.should_surface());
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.toast_message(), "Internal Server Error");

        let err = NextboxError::from(HostError::failure("network down"));
        assert!(err.should_surface());
        assert_eq!(err.toast_message(), "network down");
    }

    #[test]
    fn body_errors_keep_the_response_text() {
        let err = NextboxError::from_body(&RawResponse::new(502, "upstream timeout"));
        assert_eq!(err.to_string(), "upstream timeout");
        assert!(err.should_surface());

        let err = NextboxError::from_body(&RawResponse::new(200, "{}"));
        assert!(matches!(err, NextboxError::Rejected { status: 200, .. }));
    }

    #[test]
    fn save_blocked_uses_catalog_title() {
        assert_eq!(NextboxError::SaveBlocked.to_string(), SAVE_IS_BLOCKED_TITLE);
        assert!(NextboxError::SaveBlocked.is_save_blocked());
    }
}
