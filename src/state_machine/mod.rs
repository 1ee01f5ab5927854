// Lifecycle state machine for a single SpiceDB test container.
//
// The controller consults this table before every side effect, so an illegal
// sequence (e.g. starting twice) is rejected before any container work happens.

pub mod events;
pub mod states;

pub use events::LifecycleEvent;
pub use states::ContainerState;

use crate::error::{Result, SpiceDbError};
use tracing::debug;

/// A recorded state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ContainerState,
    pub to: ContainerState,
    pub event: LifecycleEvent,
}

/// Tracks the current state and the transitions taken so far
#[derive(Debug, Default)]
pub struct LifecycleStateMachine {
    state: ContainerState,
    history: Vec<Transition>,
}

impl LifecycleStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn current_state(&self) -> ContainerState {
        self.state
    }

    /// All transitions applied so far, oldest first
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Apply an event, returning the new state
    pub fn transition(&mut self, event: LifecycleEvent) -> Result<ContainerState> {
        let target = Self::determine_target_state(self.state, event)?;

        debug!(
            from = %self.state,
            to = %target,
            event = %event,
            "container lifecycle transition"
        );

        self.history.push(Transition {
            from: self.state,
            to: target,
            event,
        });
        self.state = target;
        Ok(target)
    }

    /// Determine the target state based on current state and event
    pub fn determine_target_state(
        current_state: ContainerState,
        event: LifecycleEvent,
    ) -> Result<ContainerState> {
        use ContainerState as S;
        use LifecycleEvent as E;

        let target = match (current_state, event) {
            (S::Created, E::Start) => S::Starting,

            (S::Starting, E::Ready) => S::Ready,
            (S::Starting, E::Fail) => S::Failed,

            // Stopping is always permitted once something may be running, and
            // is a no-op before start or after a previous stop.
            (S::Created | S::Starting | S::Ready | S::Failed | S::Stopped, E::Stop) => S::Stopped,

            (from, event) => return Err(SpiceDbError::InvalidTransition { from, event }),
        };

        Ok(target)
    }
}
