//! Tracing setup: stderr plus a daily rolling file.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalOpts;

const LOG_PREFIX: &str = "firegate";
const LOG_SUFFIX: &str = "log";

/// Install the global subscriber. The returned guard must be held until
/// exit so buffered file output is flushed.
pub fn init(global: &GlobalOpts) -> Option<WorkerGuard> {
    let log_level = match global.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let (file_layer, guard, file_error) = match log_dir(global) {
        Some(dir) => match file_appender(&dir) {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true);
                (Some(layer), Some(guard), None)
            }
            Err(reason) => (None, None, Some((dir, reason))),
        },
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    if let Some((dir, reason)) = file_error {
        tracing::warn!(dir = %dir.display(), %reason, "file logging disabled");
    }

    guard
}

fn log_dir(global: &GlobalOpts) -> Option<PathBuf> {
    if global.no_log_file {
        return None;
    }
    global
        .log_dir
        .clone()
        .or_else(|| firegate_config::executable_dir().map(|dir| dir.join("logs")))
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .build(dir)
        .map_err(|e| e.to_string())
}
