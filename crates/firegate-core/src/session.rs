// ── Portal sign-in with retry ──
//
// Keeps signing in until the portal hands out a session, the response
// proves unusable, or shutdown is requested. Transport failures and
// non-2xx statuses wait a fixed delay and try again, without limit.

use std::time::Duration;

use firegate_api::SessionId;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Credentials;
use crate::error::CoreError;
use crate::portal::DoorPortal;

/// How a sign-in loop ended, short of a fatal error.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(SessionId),
    /// Shutdown was requested before a session was obtained.
    Cancelled,
}

/// Sign in, retrying every `retry_delay` until success or cancellation.
///
/// Cancellation is honoured before each attempt, while a request is in
/// flight and during the wait between attempts; it is never reported as a
/// sign-in failure. Only a fatal error (no session identifier in a 2xx
/// response, unusable URL) ends the loop with `Err`.
pub async fn authenticate<P: DoorPortal>(
    portal: &P,
    credentials: &Credentials,
    retry_delay: Duration,
    cancel: &CancellationToken,
) -> Result<AuthOutcome, CoreError> {
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            info!(attempts = attempt, "sign-in cancelled");
            return Ok(AuthOutcome::Cancelled);
        }

        attempt += 1;
        info!(attempt, username = %credentials.username, "signing in to portal");

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(attempt, "sign-in cancelled mid-request");
                return Ok(AuthOutcome::Cancelled);
            }
            result = portal.login(&credentials.username, &credentials.password_hash) => result,
        };

        match result {
            Ok(session) => {
                info!(attempt, "signed in, session identifier received");
                return Ok(AuthOutcome::Authenticated(session));
            }
            Err(err) => {
                let err = CoreError::from_auth(err);
                if err.is_fatal() {
                    error!(attempt, error = %err, "sign-in cannot succeed, giving up");
                    return Err(err);
                }
                warn!(
                    attempt,
                    error = %err,
                    retry_in_secs = retry_delay.as_secs(),
                    "sign-in failed, retrying"
                );
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(attempts = attempt, "sign-in cancelled during backoff");
                return Ok(AuthOutcome::Cancelled);
            }
            () = tokio::time::sleep(retry_delay) => {}
        }
    }
}
