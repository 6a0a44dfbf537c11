// ── Watchdog ──
//
// Full lifecycle of one watched door: sign in, then poll -> evaluate ->
// dispatch -> sleep until cancelled. Session, controller state and the
// HTTP client are owned fields of a single `Watchdog`, touched only from
// the one sequential poll flow.

use std::time::Duration;

use firegate_api::{PortalClient, SessionId, TlsMode, TransportConfig};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{TlsVerification, WatchdogConfig};
use crate::dispatcher;
use crate::error::CoreError;
use crate::model::{ActedState, DomainState};
use crate::poller::StatusPoller;
use crate::portal::DoorPortal;
use crate::session::{self, AuthOutcome};
use crate::transition::{Evaluation, TransitionController};

// ── WatchdogStatus ───────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogStatus {
    Idle,
    Authenticating,
    Monitoring { last_acted: ActedState },
    Stopped,
}

/// Result of one poll cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub observed: DomainState,
    pub evaluation: Evaluation,
}

/// Counters reported when the poll loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub actions: u64,
    pub failed_actions: u64,
}

// ── Watchdog ─────────────────────────────────────────────────────

/// Keeps every managed door's lock state in step with the watched door.
pub struct Watchdog<P = PortalClient> {
    config: WatchdogConfig,
    portal: P,
    poller: StatusPoller,
    transitions: TransitionController,
    session: Option<SessionId>,
    cancel: CancellationToken,
    status: watch::Sender<WatchdogStatus>,
}

impl Watchdog<PortalClient> {
    /// Build a watchdog talking to the configured portal over a fresh
    /// connection pool. Does NOT sign in.
    pub fn new(config: WatchdogConfig, cancel: CancellationToken) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let portal = PortalClient::new(config.portal_url.clone(), &config.paths, &transport)
            .map_err(|e| CoreError::Config {
                message: format!("cannot set up portal client: {e}"),
            })?;
        Ok(Self::with_portal(config, portal, cancel))
    }
}

impl<P: DoorPortal> Watchdog<P> {
    /// Build a watchdog around an existing portal implementation.
    pub fn with_portal(config: WatchdogConfig, portal: P, cancel: CancellationToken) -> Self {
        let poller = StatusPoller::new(config.door_name.clone(), config.state_codes);
        let (status, _) = watch::channel(WatchdogStatus::Idle);
        Self {
            config,
            portal,
            poller,
            transitions: TransitionController::new(),
            session: None,
            cancel,
            status,
        }
    }

    /// Subscribe to lifecycle changes.
    pub fn status(&self) -> watch::Receiver<WatchdogStatus> {
        self.status.subscribe()
    }

    /// The token that stops this watchdog.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn last_acted(&self) -> ActedState {
        self.transitions.last_acted()
    }

    // ── Steps ────────────────────────────────────────────────────

    /// Sign in, retrying until success or cancellation.
    ///
    /// Returns `Ok(false)` if cancelled before a session was obtained.
    pub async fn authenticate(&mut self) -> Result<bool, CoreError> {
        self.status.send_replace(WatchdogStatus::Authenticating);

        let outcome = session::authenticate(
            &self.portal,
            &self.config.credentials,
            self.config.auth_retry_delay,
            &self.cancel,
        )
        .await?;

        match outcome {
            AuthOutcome::Authenticated(session) => {
                self.session = Some(session);
                self.status.send_replace(WatchdogStatus::Monitoring {
                    last_acted: self.transitions.last_acted(),
                });
                Ok(true)
            }
            AuthOutcome::Cancelled => Ok(false),
        }
    }

    /// Run one poll cycle: fetch, classify, and act on an edge.
    ///
    /// A failed dispatch is part of a successful cycle (reported in the
    /// [`Evaluation`]); an `Err` means no state could be observed.
    pub async fn poll_once(&mut self) -> Result<CycleReport, CoreError> {
        let session = self.session.as_ref().ok_or(CoreError::NotAuthenticated)?;
        let portal = &self.portal;

        let observed = self.poller.fetch_domain_state(portal, session).await?;

        let evaluation = self
            .transitions
            .evaluate(observed, |action| {
                dispatcher::dispatch(portal, session, action)
            })
            .await;

        if let Evaluation::Dispatched(_) = evaluation {
            self.status.send_replace(WatchdogStatus::Monitoring {
                last_acted: self.transitions.last_acted(),
            });
        }

        Ok(CycleReport {
            observed,
            evaluation,
        })
    }

    // ── Main loop ────────────────────────────────────────────────

    /// Sign in and poll until cancelled.
    ///
    /// Consumes the watchdog: the HTTP client is dropped when this returns,
    /// whichever way it returns. Only fatal errors end the loop early.
    pub async fn run(mut self) -> Result<RunSummary, CoreError> {
        info!(
            door = %self.config.door_name,
            portal = %self.config.portal_url,
            interval_secs = self.config.poll_interval.as_secs(),
            "watchdog starting"
        );

        let mut summary = RunSummary::default();

        match self.authenticate().await {
            Ok(true) => {}
            Ok(false) => {
                self.stop(&summary);
                return Ok(summary);
            }
            Err(err) => {
                self.status.send_replace(WatchdogStatus::Stopped);
                return Err(err);
            }
        }

        info!(door = %self.config.door_name, "polling started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            summary.cycles += 1;
            match self.poll_once().await {
                Ok(report) => match report.evaluation {
                    Evaluation::Steady => {}
                    Evaluation::Dispatched(_) => summary.actions += 1,
                    Evaluation::Failed(..) => summary.failed_actions += 1,
                },
                Err(err) => {
                    summary.failed_cycles += 1;
                    log_cycle_error(summary.cycles, &err);
                    if err.is_fatal() {
                        self.status.send_replace(WatchdogStatus::Stopped);
                        return Err(err);
                    }
                }
            }

            if !self.sleep(self.config.poll_interval).await {
                break;
            }
        }

        self.stop(&summary);
        Ok(summary)
    }

    /// Sleep unless cancelled first. Returns `false` on cancellation.
    async fn sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }

    fn stop(&self, summary: &RunSummary) {
        self.status.send_replace(WatchdogStatus::Stopped);
        info!(
            cycles = summary.cycles,
            failed_cycles = summary.failed_cycles,
            actions = summary.actions,
            failed_actions = summary.failed_actions,
            "watchdog stopped"
        );
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn log_cycle_error(cycle: u64, err: &CoreError) {
    match err {
        CoreError::EntityNotFound { name, .. } => error!(
            cycle,
            error = %err,
            "watched door '{name}' is not listed by the portal; check `fireDoorName` in the settings"
        ),
        CoreError::PollMalformed { .. } | CoreError::Config { .. } => {
            error!(cycle, error = %err, "poll cycle failed");
        }
        _ => warn!(cycle, error = %err, "poll cycle failed, will retry next interval"),
    }
}

/// Build a [`TransportConfig`] from the watchdog configuration.
fn build_transport(config: &WatchdogConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
