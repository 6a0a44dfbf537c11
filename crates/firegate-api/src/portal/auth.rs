// Portal sign-in
//
// A single sign-in attempt. Retrying is the caller's business: the
// daemon keeps trying through outages, a one-shot tool would not.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse, SessionId};
use crate::portal::client::{Endpoint, PortalClient};

impl PortalClient {
    /// Sign in with a username and password hash.
    ///
    /// `POST {base}{auth}` with `{"UserName": ..., "PasswordHash": ...}`.
    ///
    /// A 2xx response without a `UserSID` yields [`Error::MissingField`];
    /// a 2xx response that is not JSON yields [`Error::Deserialization`].
    pub async fn login(
        &self,
        username: &str,
        password_hash: &SecretString,
    ) -> Result<SessionId, Error> {
        debug!(username, "signing in");

        let body = LoginRequest {
            user_name: username,
            password_hash: password_hash.expose_secret(),
        };

        let resp: LoginResponse = self.post_json(Endpoint::Auth, &body).await?;

        match resp.user_sid {
            Some(sid) if !sid.is_empty() => {
                debug!("sign-in successful");
                Ok(SessionId::new(sid))
            }
            _ => Err(Error::MissingField {
                endpoint: Endpoint::Auth.name(),
                field: "UserSID",
            }),
        }
    }
}
