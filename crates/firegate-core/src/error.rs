// ── Core error types ──
//
// What a failure *means* for the watchdog. The same wire error is
// transient during sign-in, skips a cycle while polling and merely
// postpones an action during dispatch, so translation from
// `firegate_api::Error` is explicit per step rather than a blanket `From`.

use thiserror::Error;

use crate::model::DoorAction;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Sign-in ──────────────────────────────────────────────────────
    #[error("Cannot reach portal during sign-in: {reason}")]
    AuthTransport { reason: String },

    #[error("Sign-in rejected (HTTP {status}): {message}")]
    AuthStatus { status: u16, message: String },

    #[error("Sign-in response carried no session identifier: {message}")]
    AuthFieldMissing { message: String },

    #[error("Not signed in to the portal")]
    NotAuthenticated,

    // ── Polling ──────────────────────────────────────────────────────
    #[error("Cannot reach portal while polling: {reason}")]
    PollTransport { reason: String },

    #[error("Door list request failed (HTTP {status}): {message}")]
    PollStatus { status: u16, message: String },

    #[error("Door list response is malformed: {message}")]
    PollMalformed { message: String },

    #[error("Door '{name}' not found among {listed} doors listed by the portal")]
    EntityNotFound { name: String, listed: usize },

    // ── Dispatch ─────────────────────────────────────────────────────
    #[error("{action} failed: {reason}")]
    ActionDispatch {
        action: DoorAction,
        reason: String,
        status: Option<u16>,
    },
}

impl CoreError {
    /// Translate an API error raised while signing in.
    pub fn from_auth(err: firegate_api::Error) -> Self {
        use firegate_api::Error as Api;
        match err {
            Api::Status { status, body, .. } => Self::AuthStatus {
                status,
                message: body,
            },
            Api::MissingField { field, .. } => Self::AuthFieldMissing {
                message: format!("`{field}` absent from a successful response"),
            },
            Api::Deserialization { message, .. } => Self::AuthFieldMissing { message },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid portal URL: {e}"),
            },
            Api::Transport(_) | Api::Timeout { .. } | Api::Tls(_) => Self::AuthTransport {
                reason: err.to_string(),
            },
        }
    }

    /// Translate an API error raised while fetching the door list.
    pub fn from_poll(err: firegate_api::Error) -> Self {
        use firegate_api::Error as Api;
        match err {
            Api::Status { status, body, .. } => Self::PollStatus {
                status,
                message: body,
            },
            Api::MissingField { .. } | Api::Deserialization { .. } => Self::PollMalformed {
                message: err.to_string(),
            },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid portal URL: {e}"),
            },
            Api::Transport(_) | Api::Timeout { .. } | Api::Tls(_) => Self::PollTransport {
                reason: err.to_string(),
            },
        }
    }

    /// Translate an API error raised by a bulk lock/unlock call.
    pub fn from_dispatch(action: DoorAction, err: &firegate_api::Error) -> Self {
        Self::ActionDispatch {
            action,
            reason: err.to_string(),
            status: err.status(),
        }
    }

    /// Returns `true` for errors that must stop the daemon.
    ///
    /// Everything else is logged and survived: sign-in failures are
    /// retried, poll and dispatch failures wait for the next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::AuthFieldMissing { .. })
    }
}
