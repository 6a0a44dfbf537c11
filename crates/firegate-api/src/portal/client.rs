// Portal HTTP client
//
// Wraps `reqwest::Client` with the portal's URL scheme (base URL plus a
// configured relative path per endpoint), status checking and JSON body
// decoding. Endpoint methods live in sibling files as inherent impls.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Maximum number of body characters kept in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Relative paths of the four portal endpoints, appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalPaths {
    pub auth: String,
    pub door_get_list: String,
    pub door_unlock_all: String,
    pub door_lock_all: String,
}

/// The portal endpoints this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Auth,
    DoorList,
    UnlockAll,
    LockAll,
}

impl Endpoint {
    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::DoorList => "door list",
            Self::UnlockAll => "unlock all",
            Self::LockAll => "lock all",
        }
    }
}

/// Raw HTTP client for the access-control portal.
///
/// All endpoint URLs are resolved once at construction, so a bad path is
/// reported at startup rather than on the first poll.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    auth_url: Url,
    door_list_url: Url,
    unlock_all_url: Url,
    lock_all_url: Url,
}

impl PortalClient {
    /// Create a client with a fresh connection pool built from `transport`.
    pub fn new(
        base_url: Url,
        paths: &PortalPaths,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, paths)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        paths: &PortalPaths,
    ) -> Result<Self, Error> {
        Ok(Self {
            auth_url: join_path(&base_url, &paths.auth)?,
            door_list_url: join_path(&base_url, &paths.door_get_list)?,
            unlock_all_url: join_path(&base_url, &paths.door_unlock_all)?,
            lock_all_url: join_path(&base_url, &paths.door_lock_all)?,
            http,
        })
    }

    /// The resolved URL for an endpoint.
    pub fn url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Auth => &self.auth_url,
            Endpoint::DoorList => &self.door_list_url,
            Endpoint::UnlockAll => &self.unlock_all_url,
            Endpoint::LockAll => &self.lock_all_url,
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a JSON body and fail on any non-2xx status.
    pub(crate) async fn post(
        &self,
        endpoint: Endpoint,
        body: &(impl Serialize + Sync),
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(endpoint).clone();
        debug!(endpoint = endpoint.name(), %url, "POST");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        endpoint: endpoint.name(),
                    }
                } else {
                    Error::Transport(e)
                }
            })?;

        let status = resp.status();
        trace!(endpoint = endpoint.name(), status = status.as_u16(), "response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                endpoint: endpoint.name(),
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        Ok(resp)
    }

    /// POST a JSON body and decode the JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let resp = self.post(endpoint, body).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!(
                "{} response: {e} (body preview: {:?})",
                endpoint.name(),
                preview(&body)
            ),
            body,
        })
    }
}

/// Append a relative endpoint path to the base URL with exactly one `/`
/// between them. Any path prefix already on the base URL is kept.
fn join_path(base: &Url, path: &str) -> Result<Url, Error> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
