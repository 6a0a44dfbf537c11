//! `firegate check`: validate the settings without contacting the portal.

use firegate_core::{TlsVerification, WatchdogConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (path, config) = super::load_watchdog_config(global)?;
    println!("settings:   {}", path.display());
    print!("{}", describe(&config));
    println!("settings OK");
    Ok(())
}

/// Human-readable, secret-free summary of a resolved configuration.
fn describe(config: &WatchdogConfig) -> String {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => "system CA store".to_owned(),
        TlsVerification::CustomCa(path) => format!("custom CA {}", path.display()),
        TlsVerification::DangerAcceptInvalid => "NOT VERIFIED (acceptInvalidCerts)".to_owned(),
    };

    let paths = &config.paths;
    let mut out = String::new();
    for (label, value) in [
        ("portal", config.portal_url.to_string()),
        ("auth", paths.auth.clone()),
        ("door list", paths.door_get_list.clone()),
        ("unlock all", paths.door_unlock_all.clone()),
        ("lock all", paths.door_lock_all.clone()),
        ("user", config.credentials.username.clone()),
        ("door", config.door_name.clone()),
        (
            "states",
            format!(
                "open={} normal={}",
                config.state_codes.open, config.state_codes.normal
            ),
        ),
        ("interval", format!("{}s", config.poll_interval.as_secs())),
        ("auth retry", format!("{}s", config.auth_retry_delay.as_secs())),
        ("timeout", format!("{}s", config.timeout.as_secs())),
        ("tls", tls),
    ] {
        out.push_str(&format!("{:<11} {value}\n", format!("{label}:")));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use firegate_core::{Credentials, PortalPaths, StateCodes};
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn summary_never_contains_the_password_hash() {
        let config = WatchdogConfig {
            portal_url: "http://10.0.0.5:8080".parse().unwrap(),
            paths: PortalPaths {
                auth: "/api/Authenticate".into(),
                door_get_list: "/api/Door/GetList".into(),
                door_unlock_all: "/api/Door/UnlockAll".into(),
                door_lock_all: "/api/Door/LockAll".into(),
            },
            credentials: Credentials {
                username: "operator".into(),
                password_hash: SecretString::from("5E884898DA28047151D0E56F".to_string()),
            },
            door_name: "FireDoor".into(),
            state_codes: StateCodes { open: 1, normal: 0 },
            poll_interval: Duration::from_secs(5),
            auth_retry_delay: Duration::from_secs(10),
            tls: TlsVerification::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
        };

        let summary = describe(&config);

        assert!(summary.lines().any(|l| l.starts_with("door:") && l.ends_with(" FireDoor")));
        assert!(summary.contains("open=1 normal=0"));
        assert!(summary.contains("NOT VERIFIED"));
        assert!(!summary.contains("5E884898"), "{summary}");
    }
}
