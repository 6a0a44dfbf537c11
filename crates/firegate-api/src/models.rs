// Portal wire types
//
// Request and response bodies for the four portal endpoints. Field names
// follow the portal's PascalCase JSON; the session token is spelled
// `UserSID` on the wire.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque session token returned by sign-in, required on every later call.
///
/// Redacted in `Debug` output so it never lands in logs.
#[derive(Clone)]
pub struct SessionId(SecretString);

impl SessionId {
    pub fn new(sid: impl Into<String>) -> Self {
        Self(SecretString::from(sid.into()))
    }

    /// The raw token, for building request bodies.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId([REDACTED])")
    }
}

// ── Requests ─────────────────────────────────────────────────────────

/// `POST {auth}` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LoginRequest<'a> {
    pub user_name: &'a str,
    pub password_hash: &'a str,
}

/// `POST {door list}` body.
///
/// The portal wants an explicit empty language, a live subscription and
/// an unbounded page starting at token 0.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DoorListRequest<'a> {
    pub language: &'a str,
    #[serde(rename = "UserSID")]
    pub user_sid: &'a str,
    pub subscription_enabled: bool,
    pub limit: u32,
    pub start_token: u32,
}

impl<'a> DoorListRequest<'a> {
    pub(crate) fn new(session: &'a SessionId) -> Self {
        Self {
            language: "",
            user_sid: session.expose(),
            subscription_enabled: true,
            limit: 0,
            start_token: 0,
        }
    }
}

/// `POST {lock all}` / `POST {unlock all}` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SessionRequest<'a> {
    pub language: &'a str,
    #[serde(rename = "UserSID")]
    pub user_sid: &'a str,
}

impl<'a> SessionRequest<'a> {
    pub(crate) fn new(session: &'a SessionId) -> Self {
        Self {
            language: "",
            user_sid: session.expose(),
        }
    }
}

// ── Responses ────────────────────────────────────────────────────────

/// Sign-in response. Only the session token matters; anything else the
/// portal sends is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(rename = "UserSID")]
    pub user_sid: Option<String>,
}

/// Door list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DoorListResponse {
    pub door: Vec<DoorRecord>,
}

/// One door as reported by the portal.
///
/// Portals list doors that are half configured, so each field is read
/// leniently: a null, missing or wrongly typed value becomes `None`
/// instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DoorRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    /// Raw sensor reading; the meaning of each code is site configuration.
    #[serde(default, deserialize_with = "lenient")]
    pub hardware_state: Option<i64>,
}

impl DoorRecord {
    pub fn new(name: impl Into<String>, hardware_state: i64) -> Self {
        Self {
            name: Some(name.into()),
            hardware_state: Some(hardware_state),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn door_record_tolerates_bad_fields() {
        let resp: DoorListResponse = serde_json::from_str(
            r#"{"Door": [
                {"Name": null, "HardwareState": 0},
                {"Name": "Gate", "HardwareState": "1"},
                {"HardwareState": 2},
                {"Name": "FireDoor", "HardwareState": 1, "Id": 9}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            resp.door,
            vec![
                DoorRecord { name: None, hardware_state: Some(0) },
                DoorRecord { name: Some("Gate".into()), hardware_state: None },
                DoorRecord { name: None, hardware_state: Some(2) },
                DoorRecord::new("FireDoor", 1),
            ]
        );
    }
}
