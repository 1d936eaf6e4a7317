//! Failure taxonomy for a chat submission.
//!
//! Every variant renders as the plain text shown in the error box, so
//! `to_string()` is the user-facing message.

use thiserror::Error;

/// Shown when a failure carries no better message of its own.
pub const GENERIC_ERROR: &str = "An error occurred while sending your message";

#[derive(Debug, Error)]
pub enum ChatError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, reset...).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A success status whose body is not `{"reply": "..."}`.
    #[error("{}", GENERIC_ERROR)]
    MalformedResponse(#[source] serde_json::Error),

    /// The background request task panicked or was aborted.
    #[error("{}", GENERIC_ERROR)]
    TaskFailed,
}

impl ChatError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } => Some(*status),
            ChatError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_its_message_verbatim() {
        let err = ChatError::Status {
            status: 429,
            message: "Rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limited");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn malformed_response_uses_generic_text() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ChatError::MalformedResponse(parse_err);
        assert_eq!(err.to_string(), GENERIC_ERROR);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn task_failure_uses_generic_text() {
        assert_eq!(ChatError::TaskFailed.to_string(), GENERIC_ERROR);
    }
}
