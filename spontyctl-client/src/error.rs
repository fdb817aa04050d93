/// Structured error types for spontyctl-client.
///
/// Same split as spontyctl-core: `thiserror` here so SDK consumers can
/// match on failure modes, `anyhow` only in the CLI binary.

use reqwest::StatusCode;
use thiserror::Error;

/// Longest error body carried in an `Api` error. Backends can echo the
/// request back at you; keep logs readable.
const MAX_ERROR_BODY: usize = 500;

/// Main error type for backend operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// No stored session; the operation needs a signed-in user
    #[error("no active session; run: spontyctl auth login")]
    NoSession,

    /// Backend answered with a non-success status
    #[error("{operation} failed ({status}): {body}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Request could not be sent or the response body not read
    #[error("request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Response body did not match the expected shape
    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },

    /// A user cannot be looked up as their own friend
    #[error("user is the current user, not a friend")]
    SelfFriendship,

    /// Invitation batch with no receivers
    #[error("cannot send invitations to an empty member list")]
    EmptyInvitees,

    /// Group member batch with no entries
    #[error("cannot add an empty member list to a group")]
    EmptyMembers,

    /// Session file could not be read or written
    #[error("session store error: {source}")]
    SessionStore { source: std::io::Error },

    /// Session file held something other than a session
    #[error("session file error: {source}")]
    SessionFile { source: serde_json::Error },

    /// Error bubbled up from spontyctl-core
    #[error(transparent)]
    Core(#[from] spontyctl_core::SpontyError),
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create a decode error with context
    pub fn decode(context: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { context, source }
    }

    /// Create a session store error
    pub fn session_store(source: std::io::Error) -> Self {
        Self::SessionStore { source }
    }

    /// Create a session file error
    pub fn session_file(source: serde_json::Error) -> Self {
        Self::SessionFile { source }
    }

    /// Build an `Api` error from a non-success response, consuming the
    /// body (truncated so a large error page cannot flood the logs).
    pub(crate) async fn from_response(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::Api {
            operation,
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body;
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::NoSession;
        assert!(err.to_string().contains("spontyctl auth login"));

        let err = ApiError::Api {
            operation: "events",
            status: StatusCode::UNAUTHORIZED,
            body: "JWT expired".to_string(),
        };
        assert!(err.to_string().contains("events"));
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("JWT expired"));
    }

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(truncate_body("short".to_string()), "short");
    }

    #[test]
    fn test_truncate_body_long_is_cut() {
        let long = "x".repeat(2000);
        let cut = truncate_body(long);
        assert!(cut.len() <= MAX_ERROR_BODY + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // Multi-byte characters straddling the cut point must not panic.
        let long = "ü".repeat(MAX_ERROR_BODY);
        let cut = truncate_body(long);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_core_error_conversion() {
        let core_err = spontyctl_core::SpontyError::config("missing url");
        let err: ApiError = core_err.into();
        assert!(matches!(err, ApiError::Core(_)));
    }
}
