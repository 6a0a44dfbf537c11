// Portal door endpoints
//
// Door listing and the two bulk commands.

use tracing::debug;

use crate::error::Error;
use crate::models::{DoorListRequest, DoorListResponse, DoorRecord, SessionId, SessionRequest};
use crate::portal::client::{Endpoint, PortalClient};

impl PortalClient {
    /// List every door the session can see.
    ///
    /// `POST {base}{door list}` with
    /// `{"Language": "", "UserSID": ..., "SubscriptionEnabled": true, "Limit": 0, "StartToken": 0}`
    pub async fn list_doors(&self, session: &SessionId) -> Result<Vec<DoorRecord>, Error> {
        let resp: DoorListResponse = self
            .post_json(Endpoint::DoorList, &DoorListRequest::new(session))
            .await?;
        debug!(count = resp.door.len(), "door list received");
        Ok(resp.door)
    }

    /// Unlock all managed doors.
    ///
    /// `POST {base}{unlock all}` with `{"Language": "", "UserSID": ...}`.
    /// Only the status matters; the body is ignored.
    pub async fn unlock_all(&self, session: &SessionId) -> Result<(), Error> {
        let resp = self
            .post(Endpoint::UnlockAll, &SessionRequest::new(session))
            .await?;
        debug!(status = resp.status().as_u16(), "unlock all accepted");
        Ok(())
    }

    /// Lock all managed doors.
    ///
    /// `POST {base}{lock all}` with `{"Language": "", "UserSID": ...}`.
    pub async fn lock_all(&self, session: &SessionId) -> Result<(), Error> {
        let resp = self
            .post(Endpoint::LockAll, &SessionRequest::new(session))
            .await?;
        debug!(status = resp.status().as_u16(), "lock all accepted");
        Ok(())
    }
}
