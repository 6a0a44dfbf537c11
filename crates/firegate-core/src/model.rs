// ── Domain model ──
//
// The three-valued reading of the watched door, the two-valued state the
// transition controller acts on, and the bulk actions it can issue.

use strum::Display;

/// Classification of the watched door's hardware-state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DomainState {
    Open,
    Normal,
    /// A code matching neither configured value. Never acted upon.
    Unrecognized,
}

/// The last state the controller successfully acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActedState {
    Open,
    #[default]
    Normal,
}

impl From<ActedState> for DomainState {
    fn from(state: ActedState) -> Self {
        match state {
            ActedState::Open => Self::Open,
            ActedState::Normal => Self::Normal,
        }
    }
}

/// A bulk command against every managed door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DoorAction {
    UnlockAll,
    LockAll,
}

impl DoorAction {
    /// The acted-upon state once this action has gone through.
    pub fn target(self) -> ActedState {
        match self {
            Self::UnlockAll => ActedState::Open,
            Self::LockAll => ActedState::Normal,
        }
    }
}
