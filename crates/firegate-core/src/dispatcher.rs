// ── Action dispatcher ──
//
// Issues the bulk unlock / lock command for a decided action. Failures
// are returned, never escalated: the transition controller keeps the edge
// pending and the next poll cycle tries again.

use firegate_api::SessionId;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::DoorAction;
use crate::portal::DoorPortal;

/// Send `action` to the portal using `session`.
pub async fn dispatch<P: DoorPortal>(
    portal: &P,
    session: &SessionId,
    action: DoorAction,
) -> Result<(), CoreError> {
    info!(%action, "dispatching bulk door command");

    let result = match action {
        DoorAction::UnlockAll => portal.unlock_all(session).await,
        DoorAction::LockAll => portal.lock_all(session).await,
    };

    match result {
        Ok(()) => {
            info!(%action, "bulk door command accepted");
            Ok(())
        }
        Err(err) => {
            let err = CoreError::from_dispatch(action, &err);
            warn!(%action, error = %err, "bulk door command failed");
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedPortal, status_error};

    #[tokio::test]
    async fn routes_each_action_to_its_endpoint() {
        let portal = ScriptedPortal::new();
        let session = SessionId::new("sid");

        dispatch(&portal, &session, DoorAction::UnlockAll)
            .await
            .unwrap();
        dispatch(&portal, &session, DoorAction::LockAll)
            .await
            .unwrap();

        assert_eq!(
            portal.actions(),
            vec![DoorAction::UnlockAll, DoorAction::LockAll]
        );
    }

    #[tokio::test]
    async fn failure_is_reported_not_raised() {
        let portal = ScriptedPortal::new();
        portal.push_unlock(Err(status_error("unlock all", 502)));

        let err = dispatch(&portal, &SessionId::new("sid"), DoorAction::UnlockAll)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::ActionDispatch {
                action: DoorAction::UnlockAll,
                status: Some(502),
                ..
            }
        ));
    }
}
