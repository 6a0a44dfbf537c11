// ── Transition controller ──
//
// Edge-triggered state machine over {Normal, Open}. The watched door is a
// level signal; only a change relative to the last *successfully*
// acted-upon state produces an action. A failed dispatch leaves the state
// untouched, so the same edge is attempted again on the next cycle.
//
//   last = Normal, observed = Open    -> unlock all, on success last = Open
//   last = Open,   observed = Normal  -> lock all,   on success last = Normal
//   anything else (incl. Unrecognized) -> nothing

use std::future::Future;

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{ActedState, DomainState, DoorAction};

/// What one evaluation did.
#[derive(Debug)]
pub enum Evaluation {
    /// No edge: nothing dispatched, state unchanged.
    Steady,
    /// The action went through and the state advanced.
    Dispatched(DoorAction),
    /// The action failed; the edge stays pending.
    Failed(DoorAction, CoreError),
}

impl Evaluation {
    pub fn action(&self) -> Option<DoorAction> {
        match self {
            Self::Steady => None,
            Self::Dispatched(action) | Self::Failed(action, _) => Some(*action),
        }
    }
}

/// Owner of the last acted-upon state.
#[derive(Debug, Default)]
pub struct TransitionController {
    last: ActedState,
}

impl TransitionController {
    /// Start from [`ActedState::Normal`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(last: ActedState) -> Self {
        Self { last }
    }

    pub fn last_acted(&self) -> ActedState {
        self.last
    }

    /// The action an observation calls for, without performing it.
    pub fn pending_action(&self, observed: DomainState) -> Option<DoorAction> {
        match (observed, self.last) {
            (DomainState::Open, ActedState::Normal) => Some(DoorAction::UnlockAll),
            (DomainState::Normal, ActedState::Open) => Some(DoorAction::LockAll),
            _ => None,
        }
    }

    /// Compare `observed` with the last acted-upon state and, on an edge,
    /// run `dispatch` once. The state advances only if `dispatch` succeeds.
    pub async fn evaluate<F, Fut>(&mut self, observed: DomainState, dispatch: F) -> Evaluation
    where
        F: FnOnce(DoorAction) -> Fut,
        Fut: Future<Output = Result<(), CoreError>>,
    {
        let Some(action) = self.pending_action(observed) else {
            debug!(%observed, last_acted = %self.last, "no transition");
            return Evaluation::Steady;
        };

        match dispatch(action).await {
            Ok(()) => {
                let from = self.last;
                self.last = action.target();
                info!(%action, %from, to = %self.last, "transition applied");
                Evaluation::Dispatched(action)
            }
            Err(err) => {
                info!(%action, last_acted = %self.last, "transition pending, will retry next cycle");
                Evaluation::Failed(action, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::StateCodes;

    fn refused(action: DoorAction) -> CoreError {
        CoreError::ActionDispatch {
            action,
            reason: "HTTP 503".into(),
            status: Some(503),
        }
    }

    /// Feed observations through a controller whose dispatches always
    /// succeed; return the action fired per poll.
    async fn run_sequence(states: &[DomainState]) -> Vec<Option<DoorAction>> {
        let mut controller = TransitionController::new();
        let mut fired = Vec::new();
        for &observed in states {
            let evaluation = controller.evaluate(observed, |_| async { Ok(()) }).await;
            fired.push(evaluation.action());
        }
        fired
    }

    #[tokio::test]
    async fn open_then_normal_fires_unlock_then_lock() {
        let codes = StateCodes { open: 1, normal: 0 };
        let states: Vec<_> = [0, 0, 1, 1, 0]
            .into_iter()
            .map(|c| codes.classify(c))
            .collect();

        assert_eq!(
            run_sequence(&states).await,
            vec![
                None,
                None,
                Some(DoorAction::UnlockAll),
                None,
                Some(DoorAction::LockAll),
            ]
        );
    }

    #[tokio::test]
    async fn sustained_open_fires_once() {
        let states = [DomainState::Open; 3];
        assert_eq!(
            run_sequence(&states).await,
            vec![Some(DoorAction::UnlockAll), None, None]
        );
    }

    #[tokio::test]
    async fn unrecognized_never_acts_nor_changes_state() {
        let mut controller = TransitionController::with_state(ActedState::Open);

        let evaluation = controller
            .evaluate(DomainState::Unrecognized, |_| async {
                panic!("must not dispatch on an unrecognized reading")
            })
            .await;

        assert!(matches!(evaluation, Evaluation::Steady));
        assert_eq!(controller.last_acted(), ActedState::Open);

        // Unrecognized between two Opens does not re-arm the edge.
        let states = [
            DomainState::Open,
            DomainState::Unrecognized,
            DomainState::Open,
            DomainState::Unrecognized,
            DomainState::Normal,
        ];
        assert_eq!(
            run_sequence(&states).await,
            vec![
                Some(DoorAction::UnlockAll),
                None,
                None,
                None,
                Some(DoorAction::LockAll),
            ]
        );
    }

    #[tokio::test]
    async fn failed_lock_is_retried_next_cycle() {
        let mut controller = TransitionController::with_state(ActedState::Open);

        let first = controller
            .evaluate(DomainState::Normal, |a| async move { Err(refused(a)) })
            .await;
        assert!(matches!(first, Evaluation::Failed(DoorAction::LockAll, _)));
        assert_eq!(controller.last_acted(), ActedState::Open);

        let second = controller
            .evaluate(DomainState::Normal, |_| async { Ok(()) })
            .await;
        assert!(matches!(second, Evaluation::Dispatched(DoorAction::LockAll)));
        assert_eq!(controller.last_acted(), ActedState::Normal);
    }

    #[tokio::test]
    async fn failed_unlock_is_dropped_if_door_returns_to_normal() {
        let mut controller = TransitionController::new();

        let failed = controller
            .evaluate(DomainState::Open, |a| async move { Err(refused(a)) })
            .await;
        assert_eq!(failed.action(), Some(DoorAction::UnlockAll));

        let steady = controller
            .evaluate(DomainState::Normal, |_| async {
                panic!("door never left normal from the controller's point of view")
            })
            .await;
        assert!(matches!(steady, Evaluation::Steady));
    }

    #[test]
    fn pending_action_covers_the_table() {
        let normal = TransitionController::with_state(ActedState::Normal);
        let open = TransitionController::with_state(ActedState::Open);

        assert_eq!(
            normal.pending_action(DomainState::Open),
            Some(DoorAction::UnlockAll)
        );
        assert_eq!(normal.pending_action(DomainState::Normal), None);
        assert_eq!(normal.pending_action(DomainState::Unrecognized), None);
        assert_eq!(
            open.pending_action(DomainState::Normal),
            Some(DoorAction::LockAll)
        );
        assert_eq!(open.pending_action(DomainState::Open), None);
        assert_eq!(open.pending_action(DomainState::Unrecognized), None);
    }
}
