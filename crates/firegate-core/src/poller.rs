// ── Status poller ──
//
// One poll = one door list request, one linear scan for the watched door
// and one classification of its hardware-state code.

use firegate_api::{DoorRecord, SessionId};
use tracing::debug;

use crate::config::StateCodes;
use crate::error::CoreError;
use crate::model::DomainState;
use crate::portal::DoorPortal;

/// Fetches and classifies the watched door's state.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    door_name: String,
    codes: StateCodes,
}

impl StatusPoller {
    pub fn new(door_name: impl Into<String>, codes: StateCodes) -> Self {
        Self {
            door_name: door_name.into(),
            codes,
        }
    }

    /// Request the door list and classify the watched door.
    ///
    /// Fails without retrying; the poll loop decides what a failed cycle
    /// means.
    pub async fn fetch_domain_state<P: DoorPortal>(
        &self,
        portal: &P,
        session: &SessionId,
    ) -> Result<DomainState, CoreError> {
        let doors = portal
            .list_doors(session)
            .await
            .map_err(CoreError::from_poll)?;
        self.classify(&doors)
    }

    /// Classify the watched door within an already-fetched door list.
    pub fn classify(&self, doors: &[DoorRecord]) -> Result<DomainState, CoreError> {
        let door = find_door(doors, &self.door_name).ok_or_else(|| CoreError::EntityNotFound {
            name: self.door_name.clone(),
            listed: doors.len(),
        })?;

        let code = door
            .hardware_state
            .ok_or_else(|| CoreError::PollMalformed {
                message: format!("door '{}' has no integer HardwareState", self.door_name),
            })?;

        let state = self.codes.classify(code);
        debug!(
            door = %self.door_name,
            hardware_state = code,
            %state,
            "door state observed"
        );
        Ok(state)
    }
}

/// First door whose name matches exactly. Unnamed records never match.
pub fn find_door<'a>(doors: &'a [DoorRecord], name: &str) -> Option<&'a DoorRecord> {
    doors.iter().find(|door| door.name.as_deref() == Some(name))
}
