//! Error type shared by the provider bindings and the backend client.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is surfaced as a panic. The session bridge logs these and
//! degrades to a signed-out / non-admin view; forms show the `Display` text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The identity provider SDK rejected the call (bad password, unknown user, ...).
    #[error("{0}")]
    Provider(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Browser-only functionality invoked outside a browser.
    #[error("not available outside the browser")]
    Unavailable,
}

impl AuthError {
    /// Stable machine-readable code, used in log lines.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Provider(_) => "E_PROVIDER",
            Self::Http(_) => "E_HTTP",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::Unavailable => "E_UNAVAILABLE",
        }
    }
}
