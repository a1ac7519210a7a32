//! Client error type shared by the HTTP adapter and the session manager.
//!
//! ERROR HANDLING
//! ==============
//! The adapter produces `Network`, `Request` and `Parse`. `AuthExpired` is a
//! classification applied by session restore when any of those occur while a
//! stored token is being validated. The remaining kinds are local: they never
//! originate from the wire.

/// Errors produced by API calls and auth-session operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect failure, bad URL, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    ///
    /// Displays as the bare message so forms can render it verbatim.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// A success body was not the structured data the endpoint requires.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A stored session was rejected while being restored.
    #[error("session expired")]
    AuthExpired,

    /// The operation needs a session that is not currently held.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A UI handle outlived the manager it was subscribed to.
    #[error("auth session closed")]
    SessionClosed,

    /// An auth operation's task ended without producing an outcome.
    #[error("auth operation interrupted: {0}")]
    Interrupted(String),
}

impl ClientError {
    /// HTTP status for `Request` errors, `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials of the current session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Request { status: 401 | 403, .. } | Self::AuthExpired)
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
