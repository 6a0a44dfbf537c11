// ── Runtime watchdog configuration ──
//
// These types describe *what* to watch and *how* to reach the portal.
// They never touch disk: `firegate-config` builds a `WatchdogConfig`
// from the settings file and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use firegate_api::PortalPaths;
use secrecy::SecretString;
use url::Url;

use crate::model::DomainState;

/// Fixed pause between failed sign-in attempts.
pub const DEFAULT_AUTH_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Portal sign-in credentials. The password is always sent pre-hashed.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password_hash: SecretString,
}

/// Hardware-state codes that mean "open" and "normal" for the watched door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCodes {
    pub open: i64,
    pub normal: i64,
}

impl StateCodes {
    /// Map a raw hardware-state code onto the domain state.
    pub fn classify(&self, code: i64) -> DomainState {
        if code == self.open {
            DomainState::Open
        } else if code == self.normal {
            DomainState::Normal
        } else {
            DomainState::Unrecognized
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed portal appliances).
    DangerAcceptInvalid,
}

/// Everything the watchdog needs, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Portal base URL (e.g., `http://10.0.0.5:8080`).
    pub portal_url: Url,
    /// Relative endpoint paths appended to `portal_url`.
    pub paths: PortalPaths,
    pub credentials: Credentials,
    /// Name of the watched door, matched exactly against the door list.
    pub door_name: String,
    pub state_codes: StateCodes,
    /// Pause between poll cycles. Must be non-zero.
    pub poll_interval: Duration,
    /// Pause between failed sign-in attempts.
    pub auth_retry_delay: Duration,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_configured_codes() {
        let codes = StateCodes { open: 1, normal: 0 };
        assert_eq!(codes.classify(1), DomainState::Open);
        assert_eq!(codes.classify(0), DomainState::Normal);
        assert_eq!(codes.classify(2), DomainState::Unrecognized);
        assert_eq!(codes.classify(-1), DomainState::Unrecognized);
    }

    #[test]
    fn classifies_site_specific_codes() {
        let codes = StateCodes { open: 17, normal: 3 };
        assert_eq!(codes.classify(17), DomainState::Open);
        assert_eq!(codes.classify(3), DomainState::Normal);
        assert_eq!(codes.classify(1), DomainState::Unrecognized);
    }
}
