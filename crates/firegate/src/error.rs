//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` and `CoreError` into operator-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use firegate_config::ConfigError;
use firegate_core::CoreError;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const AUTH: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Settings file not found: {path}")]
    #[diagnostic(
        code(firegate::no_config),
        help(
            "Place settings.json beside the executable, or pass --config <FILE>\n\
             (FIREGATE_CONFIG is honoured too)."
        )
    )]
    NoConfig { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(firegate::validation))]
    Validation { field: String, reason: String },

    #[error("No password configured for portal user '{username}'")]
    #[diagnostic(
        code(firegate::no_credentials),
        help(
            "Set PasswordHash or httpPassword in the settings file,\n\
             or export FIREGATE_PASSWORD_HASH / FIREGATE_PASSWORD."
        )
    )]
    NoCredentials { username: String },

    #[error("Could not read settings: {message}")]
    #[diagnostic(
        code(firegate::settings_load),
        help("Check that the file is valid JSON (or TOML) and that every required key is present.")
    )]
    SettingsLoad { message: String },

    #[error("Cannot set up the portal client: {message}")]
    #[diagnostic(
        code(firegate::portal_setup),
        help("Check baseUrl, caCert and acceptInvalidCerts in the settings file.")
    )]
    PortalSetup { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Portal sign-in returned no session")]
    #[diagnostic(
        code(firegate::auth_failed),
        help(
            "The portal accepted the request but sent no UserSID.\n\
             Verify httpUsername and the password hash, and that authFolder\n\
             points at the sign-in endpoint.\n\
             Detail: {message}"
        )
    )]
    AuthFailed { message: String },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Watchdog stopped: {message}")]
    #[diagnostic(code(firegate::runtime))]
    Runtime { message: String },

    #[error("Cannot install shutdown signal handler")]
    #[diagnostic(code(firegate::signal))]
    Signal {
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. }
            | Self::Validation { .. }
            | Self::NoCredentials { .. }
            | Self::SettingsLoad { .. }
            | Self::PortalSetup { .. } => exit_code::CONFIG,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Runtime { .. } | Self::Signal { .. } => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { username } => Self::NoCredentials { username },
            ConfigError::Figment(e) => Self::SettingsLoad {
                message: e.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => Self::PortalSetup { message },
            CoreError::AuthFieldMissing { message } => Self::AuthFailed { message },
            other => Self::Runtime {
                message: other.to_string(),
            },
        }
    }
}
