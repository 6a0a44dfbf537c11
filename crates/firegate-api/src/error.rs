use thiserror::Error;

/// Top-level error type for the `firegate-api` crate.
///
/// Describes what went wrong on the wire. `firegate-core` decides what a
/// failure *means* (retry, skip the cycle, abort) based on which step
/// produced it.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No response within the client's request timeout.
    #[error("{endpoint} request timed out")]
    Timeout { endpoint: &'static str },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Portal responses ────────────────────────────────────────────
    /// The portal answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    /// A success response lacked a field the caller requires.
    #[error("{endpoint} response is missing required field `{field}`")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code, if the portal responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
