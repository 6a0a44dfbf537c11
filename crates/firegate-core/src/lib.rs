//! Session, polling and edge-triggered door control for the firegate daemon.
//!
//! - **[`Watchdog`]**: owns the portal client, the session and the
//!   transition state. [`run()`](Watchdog::run) signs in (retrying through
//!   outages) and then polls on a fixed interval until its
//!   [`CancellationToken`](tokio_util::sync::CancellationToken) fires.
//!
//! - **[`session::authenticate`]**: unbounded sign-in retry with a fixed
//!   backoff, interruptible by cancellation.
//!
//! - **[`StatusPoller`]**: fetches the door list and classifies the watched
//!   door as [`DomainState::Open`], [`DomainState::Normal`] or
//!   [`DomainState::Unrecognized`].
//!
//! - **[`TransitionController`]**: unlocks all doors when the
//!   watched door opens, locks them when it returns to normal, and only
//!   advances once the portal has accepted the command.
//!
//! - **[`DoorPortal`]**: the seam between the state machine and
//!   `firegate_api::PortalClient`.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod poller;
pub mod portal;
pub mod session;
pub mod transition;
pub mod watchdog;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    Credentials, DEFAULT_AUTH_RETRY_DELAY, DEFAULT_REQUEST_TIMEOUT, StateCodes, TlsVerification,
    WatchdogConfig,
};
pub use error::CoreError;
pub use model::{ActedState, DomainState, DoorAction};
pub use poller::StatusPoller;
pub use portal::DoorPortal;
pub use session::AuthOutcome;
pub use transition::{Evaluation, TransitionController};
pub use watchdog::{CycleReport, RunSummary, Watchdog, WatchdogStatus};

pub use firegate_api::{PortalPaths, SessionId};
