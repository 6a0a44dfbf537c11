// ── Portal seam ──
//
// The four portal operations the watchdog relies on, as a trait so the
// state machine can be driven by a scripted portal in tests.

use std::future::Future;

use firegate_api::{DoorRecord, PortalClient, SessionId};
use secrecy::SecretString;

type ApiResult<T> = Result<T, firegate_api::Error>;

/// A door-control portal reachable over a session.
///
/// Each call is a single attempt; retry policy lives in the callers.
pub trait DoorPortal: Send + Sync {
    fn login(
        &self,
        username: &str,
        password_hash: &SecretString,
    ) -> impl Future<Output = ApiResult<SessionId>> + Send;

    fn list_doors(
        &self,
        session: &SessionId,
    ) -> impl Future<Output = ApiResult<Vec<DoorRecord>>> + Send;

    fn unlock_all(&self, session: &SessionId) -> impl Future<Output = ApiResult<()>> + Send;

    fn lock_all(&self, session: &SessionId) -> impl Future<Output = ApiResult<()>> + Send;
}

impl DoorPortal for PortalClient {
    fn login(
        &self,
        username: &str,
        password_hash: &SecretString,
    ) -> impl Future<Output = ApiResult<SessionId>> + Send {
        PortalClient::login(self, username, password_hash)
    }

    fn list_doors(
        &self,
        session: &SessionId,
    ) -> impl Future<Output = ApiResult<Vec<DoorRecord>>> + Send {
        PortalClient::list_doors(self, session)
    }

    fn unlock_all(&self, session: &SessionId) -> impl Future<Output = ApiResult<()>> + Send {
        PortalClient::unlock_all(self, session)
    }

    fn lock_all(&self, session: &SessionId) -> impl Future<Output = ApiResult<()>> + Send {
        PortalClient::lock_all(self, session)
    }
}
