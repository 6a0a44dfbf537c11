//! Settings for the firegate daemon.
//!
//! A JSON (or TOML) settings file, credential resolution (env + file,
//! raw passwords hashed before use), and translation to
//! `firegate_core::WatchdogConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Json, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use firegate_core::{Credentials, PortalPaths, StateCodes, TlsVerification, WatchdogConfig};

/// Settings file name looked up beside the executable and in the
/// platform config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Pre-computed password hash, takes precedence over everything else.
pub const ENV_PASSWORD_HASH: &str = "FIREGATE_PASSWORD_HASH";

/// Raw password, hashed before use.
pub const ENV_PASSWORD: &str = "FIREGATE_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for portal user '{username}'")]
    NoCredentials { username: String },

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Settings file ───────────────────────────────────────────────────

/// The settings file as written by operators.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Portal base URL (e.g., "http://10.0.0.5:8080").
    pub base_url: String,

    /// Relative endpoint paths.
    pub auth_folder: String,
    pub door_lock_all_folder: String,
    pub door_unlock_all_folder: String,
    pub door_get_list_folder: String,

    pub http_username: String,

    /// Pre-computed password hash, sent verbatim.
    #[serde(rename = "PasswordHash", default)]
    pub password_hash: Option<SecretString>,

    /// Raw password (prefer `PasswordHash` or the environment).
    #[serde(default)]
    pub http_password: Option<SecretString>,

    /// Exact name of the watched door.
    pub fire_door_name: String,

    pub timer_interval_seconds: i64,
    pub open_state: i64,
    pub normal_state: i64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    #[serde(default = "default_auth_retry")]
    pub auth_retry_seconds: u64,

    /// Skip TLS verification (self-signed portal appliances).
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Path to a custom CA certificate (PEM).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
}

fn default_request_timeout() -> u64 {
    firegate_core::DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_auth_retry() -> u64 {
    firegate_core::DEFAULT_AUTH_RETRY_DELAY.as_secs()
}

// ── Settings file path ──────────────────────────────────────────────

/// Resolve the settings file path.
///
/// An explicit path always wins. Otherwise `settings.json` beside the
/// executable is used if present, then the platform config directory.
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let beside_exe = executable_dir().map(|dir| dir.join(SETTINGS_FILE));
    if let Some(path) = beside_exe.as_ref().filter(|p| p.is_file()) {
        return path.clone();
    }

    ProjectDirs::from("org", "firegate", "firegate")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
        .or(beside_exe)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

/// Directory holding the running executable.
pub fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load settings from `path`. The format follows the file extension:
/// `.toml` is read as TOML, anything else as JSON.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let figment = if is_toml {
        Figment::new().merge(Toml::file(path))
    } else {
        Figment::new().merge(Json::file(path))
    };

    Ok(figment.extract()?)
}

// ── Validation ──────────────────────────────────────────────────────

impl Settings {
    /// Check the settings for mistakes the portal would never report
    /// clearly. Environment password overrides count as a password source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_with(&env_lookup)
    }

    fn validate_with(&self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        self.portal_url()?;
        positive_secs("timerIntervalSeconds", self.timer_interval_seconds)?;

        if self.fire_door_name.trim().is_empty() {
            return Err(invalid("fireDoorName", "must not be empty"));
        }
        if self.open_state == self.normal_state {
            return Err(invalid(
                "openState",
                format!(
                    "must differ from normalState (both are {})",
                    self.open_state
                ),
            ));
        }
        if self.http_username.trim().is_empty() {
            return Err(invalid("httpUsername", "must not be empty"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(invalid("requestTimeoutSeconds", "must be greater than zero"));
        }
        let min_retry = default_auth_retry();
        if self.auth_retry_seconds < min_retry {
            return Err(invalid(
                "authRetrySeconds",
                format!(
                    "must be at least {min_retry} seconds, got {}",
                    self.auth_retry_seconds
                ),
            ));
        }
        for (field, path) in [
            ("authFolder", &self.auth_folder),
            ("doorGetListFolder", &self.door_get_list_folder),
            ("doorUnlockAllFolder", &self.door_unlock_all_folder),
            ("doorLockAllFolder", &self.door_lock_all_folder),
        ] {
            if path.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        self.resolve_password_hash_with(lookup).map(drop)
    }

    fn portal_url(&self) -> Result<url::Url, ConfigError> {
        let url: url::Url = self
            .base_url
            .parse()
            .map_err(|e| invalid("baseUrl", format!("invalid URL '{}': {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(
                "baseUrl",
                format!("expected an http or https URL, got scheme '{other}'"),
            )),
        }
    }

    // ── Credential resolution ────────────────────────────────────────

    /// Resolve the password hash sent to the portal.
    ///
    /// Order: `FIREGATE_PASSWORD_HASH`, `PasswordHash`, `FIREGATE_PASSWORD`
    /// (hashed), `httpPassword` (hashed).
    pub fn resolve_password_hash(&self) -> Result<SecretString, ConfigError> {
        self.resolve_password_hash_with(&env_lookup)
    }

    fn resolve_password_hash_with(
        &self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<SecretString, ConfigError> {
        // 1. Pre-hashed, from the environment
        if let Some(hash) = lookup(ENV_PASSWORD_HASH).filter(|h| !h.is_empty()) {
            return Ok(SecretString::from(hash));
        }

        // 2. Pre-hashed, from the file
        if let Some(hash) = non_empty(self.password_hash.as_ref()) {
            return Ok(SecretString::from(hash.to_owned()));
        }

        // 3. Raw, from the environment
        if let Some(password) = lookup(ENV_PASSWORD).filter(|p| !p.is_empty()) {
            return Ok(hash_password(&password));
        }

        // 4. Raw, from the file
        if let Some(password) = non_empty(self.http_password.as_ref()) {
            return Ok(hash_password(password));
        }

        Err(ConfigError::NoCredentials {
            username: self.http_username.clone(),
        })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(secret: Option<&SecretString>) -> Option<&str> {
    secret
        .map(|s| s.expose_secret())
        .filter(|s| !s.is_empty())
}

fn positive_secs(field: &str, value: i64) -> Result<Duration, ConfigError> {
    match u64::try_from(value) {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(invalid(field, format!("must be greater than zero, got {value}"))),
    }
}

/// Hash a raw portal password: uppercase hex SHA-256 of its UTF-8 bytes.
pub fn hash_password(password: &str) -> SecretString {
    SecretString::from(hex::encode_upper(Sha256::digest(password.as_bytes())))
}

// ── Translation ─────────────────────────────────────────────────────

/// Validate the settings and build the core's runtime configuration.
pub fn settings_to_watchdog_config(settings: &Settings) -> Result<WatchdogConfig, ConfigError> {
    settings_to_watchdog_config_with(settings, &env_lookup)
}

fn settings_to_watchdog_config_with(
    settings: &Settings,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<WatchdogConfig, ConfigError> {
    settings.validate_with(lookup)?;

    let tls = if settings.accept_invalid_certs {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = settings.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(WatchdogConfig {
        portal_url: settings.portal_url()?,
        paths: PortalPaths {
            auth: settings.auth_folder.clone(),
            door_get_list: settings.door_get_list_folder.clone(),
            door_unlock_all: settings.door_unlock_all_folder.clone(),
            door_lock_all: settings.door_lock_all_folder.clone(),
        },
        credentials: Credentials {
            username: settings.http_username.clone(),
            password_hash: settings.resolve_password_hash_with(lookup)?,
        },
        door_name: settings.fire_door_name.clone(),
        state_codes: StateCodes {
            open: settings.open_state,
            normal: settings.normal_state,
        },
        poll_interval: positive_secs("timerIntervalSeconds", settings.timer_interval_seconds)?,
        auth_retry_delay: Duration::from_secs(settings.auth_retry_seconds),
        tls,
        timeout: Duration::from_secs(settings.request_timeout_seconds),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const SETTINGS_JSON: &str = r#"{
        "baseUrl": "http://10.0.0.5:8080",
        "authFolder": "/api/Authenticate",
        "doorLockAllFolder": "/api/Door/LockAll",
        "doorUnlockAllFolder": "/api/Door/UnlockAll",
        "doorGetListFolder": "/api/Door/GetList",
        "httpUsername": "operator",
        "PasswordHash": "0123ABCD",
        "fireDoorName": "FireDoor",
        "timerIntervalSeconds": 5,
        "openState": 1,
        "normalState": 0
    }"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn settings() -> Settings {
        let dir = TempDir::new().unwrap();
        load_settings(&write(&dir, "settings.json", SETTINGS_JSON)).unwrap()
    }

    #[test]
    fn loads_json_settings_with_defaults() {
        let s = settings();
        assert_eq!(s.base_url, "http://10.0.0.5:8080");
        assert_eq!(s.fire_door_name, "FireDoor");
        assert_eq!(s.timer_interval_seconds, 5);
        assert_eq!((s.open_state, s.normal_state), (1, 0));
        assert_eq!(s.request_timeout_seconds, 30);
        assert_eq!(s.auth_retry_seconds, 10);
        assert!(!s.accept_invalid_certs);
        assert!(s.http_password.is_none());
    }

    #[test]
    fn loads_toml_settings() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "firegate.toml",
            r#"
            baseUrl = "https://portal.example"
            authFolder = "auth"
            doorLockAllFolder = "lock"
            doorUnlockAllFolder = "unlock"
            doorGetListFolder = "list"
            httpUsername = "operator"
            httpPassword = "password"
            fireDoorName = "Stairwell B"
            timerIntervalSeconds = 2
            openState = 3
            normalState = 1
            acceptInvalidCerts = true
            "#,
        );

        let s = load_settings(&path).unwrap();
        assert_eq!(s.fire_door_name, "Stairwell B");
        assert!(s.accept_invalid_certs);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { path: ref p } if *p == path));
    }

    #[test]
    fn missing_key_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "settings.json", r#"{ "baseUrl": "http://x" }"#);
        assert!(matches!(
            load_settings(&path).unwrap_err(),
            ConfigError::Figment(_)
        ));
    }

    #[test]
    fn explicit_path_wins() {
        let explicit = Path::new("/etc/firegate/custom.json");
        assert_eq!(settings_path(Some(explicit)), explicit);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let cases: [(&str, fn(&mut Settings)); 8] = [
            ("baseUrl", |s| s.base_url = "not a url".into()),
            ("baseUrl", |s| s.base_url = "ftp://portal".into()),
            ("timerIntervalSeconds", |s| s.timer_interval_seconds = 0),
            ("timerIntervalSeconds", |s| s.timer_interval_seconds = -5),
            ("fireDoorName", |s| s.fire_door_name = "  ".into()),
            ("openState", |s| s.normal_state = s.open_state),
            ("authRetrySeconds", |s| s.auth_retry_seconds = 1),
            ("authRetrySeconds", |s| s.auth_retry_seconds = 9),
        ];

        for (expected, mutate) in cases {
            let mut s = settings();
            mutate(&mut s);
            match s.validate_with(&no_env) {
                Err(ConfigError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn auth_retry_above_floor_is_accepted() {
        let mut s = settings();
        s.auth_retry_seconds = 30;
        assert!(s.validate_with(&no_env).is_ok());

        let config = settings_to_watchdog_config_with(&s, &no_env).unwrap();
        assert_eq!(config.auth_retry_delay, Duration::from_secs(30));
    }

    #[test]
    fn no_password_source_is_rejected() {
        let mut s = settings();
        s.password_hash = None;
        assert!(matches!(
            s.validate_with(&no_env),
            Err(ConfigError::NoCredentials { ref username }) if username == "operator"
        ));

        // An environment override is enough.
        let env = |name: &str| (name == ENV_PASSWORD).then(|| "secret".to_string());
        assert!(s.validate_with(&env).is_ok());
    }

    #[test]
    fn hashes_raw_passwords_as_uppercase_sha256() {
        assert_eq!(
            hash_password("password").expose_secret(),
            "5E884898DA28047151D0E56F8DC6292773603D0D6AABBDD62A11EF721D1542D8"
        );
    }

    #[test]
    fn credential_chain_prefers_env_then_file() {
        let mut s = settings();
        s.http_password = Some(SecretString::from("password".to_string()));

        let env_hash = |name: &str| (name == ENV_PASSWORD_HASH).then(|| "ENVHASH".to_string());
        assert_eq!(
            s.resolve_password_hash_with(&env_hash)
                .unwrap()
                .expose_secret(),
            "ENVHASH"
        );

        // File hash beats both raw passwords.
        let env_raw = |name: &str| (name == ENV_PASSWORD).then(|| "other".to_string());
        assert_eq!(
            s.resolve_password_hash_with(&env_raw).unwrap().expose_secret(),
            "0123ABCD"
        );

        s.password_hash = None;
        assert_eq!(
            s.resolve_password_hash_with(&env_raw).unwrap().expose_secret(),
            hash_password("other").expose_secret()
        );
        assert_eq!(
            s.resolve_password_hash_with(&no_env).unwrap().expose_secret(),
            hash_password("password").expose_secret()
        );
    }

    #[test]
    fn translates_to_watchdog_config() {
        let mut s = settings();
        s.ca_cert = Some(PathBuf::from("/etc/ssl/portal.pem"));

        let cfg = settings_to_watchdog_config_with(&s, &no_env).unwrap();

        assert_eq!(cfg.portal_url.as_str(), "http://10.0.0.5:8080/");
        assert_eq!(cfg.paths.door_get_list, "/api/Door/GetList");
        assert_eq!(cfg.credentials.username, "operator");
        assert_eq!(cfg.credentials.password_hash.expose_secret(), "0123ABCD");
        assert_eq!(cfg.door_name, "FireDoor");
        assert_eq!(cfg.state_codes, StateCodes { open: 1, normal: 0 });
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.auth_retry_delay, Duration::from_secs(10));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(
            cfg.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/portal.pem"))
        );

        s.accept_invalid_certs = true;
        let cfg = settings_to_watchdog_config_with(&s, &no_env).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }
}
