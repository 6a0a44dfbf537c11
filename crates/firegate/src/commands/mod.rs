//! Subcommand handlers.

pub mod check;
pub mod run;

use std::path::PathBuf;

use firegate_core::WatchdogConfig;
use tracing::info;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Locate, load and validate the settings file.
fn load_watchdog_config(global: &GlobalOpts) -> Result<(PathBuf, WatchdogConfig), CliError> {
    let path = firegate_config::settings_path(global.config.as_deref());
    info!(path = %path.display(), "reading settings");

    let settings = firegate_config::load_settings(&path)?;
    let config = firegate_config::settings_to_watchdog_config(&settings)?;

    info!(door = %config.door_name, portal = %config.portal_url, "settings loaded");
    Ok((path, config))
}
