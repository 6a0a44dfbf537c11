//! `firegate run`: the watchdog daemon.

use std::time::Duration;

use firegate_core::{Watchdog, WatchdogStatus};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;

pub async fn handle(args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, config) = super::load_watchdog_config(global)?;

    let cancel = CancellationToken::new();
    let watchdog = Watchdog::new(config, cancel.clone())?;

    tokio::spawn(log_status(watchdog.status()));
    let shutdown = tokio::spawn(watch_shutdown(
        cancel.clone(),
        args.run_for.map(Duration::from_secs),
    ));

    let result = watchdog.run().await;

    // Release the shutdown watcher if the watchdog ended on its own.
    cancel.cancel();
    let signal_result = shutdown.await.unwrap_or(Ok(()));

    let summary = result?;
    signal_result?;

    info!(
        cycles = summary.cycles,
        actions = summary.actions,
        failed_actions = summary.failed_actions,
        "firegate stopped"
    );
    Ok(())
}

/// Cancel `cancel` on SIGINT, SIGTERM, or once `run_for` has elapsed.
async fn watch_shutdown(
    cancel: CancellationToken,
    run_for: Option<Duration>,
) -> Result<(), CliError> {
    let deadline = async {
        match run_for {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };

    let outcome = tokio::select! {
        () = cancel.cancelled() => Ok(()),
        res = shutdown_signal() => res.map(|signal| info!(signal, "shutdown requested")),
        () = deadline => {
            info!(secs = run_for.map_or(0, |d| d.as_secs()), "run time elapsed, stopping");
            Ok(())
        }
    };

    cancel.cancel();
    outcome.map_err(|source| CliError::Signal { source })
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "ctrl-c")
}

async fn log_status(mut status: watch::Receiver<WatchdogStatus>) {
    while status.changed().await.is_ok() {
        let current = *status.borrow_and_update();
        debug!(status = ?current, "watchdog status changed");
        if current == WatchdogStatus::Stopped {
            break;
        }
    }
}
