//! Common state machine error types
//!
//! Shared by the project and try-on state machines.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} to {to} via {event}")]
    InvalidTransition {
        from: String,
        to: String,
        event: String,
    },

    #[error("Guard condition failed: {0}")]
    GuardFailed(String),

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl StateError {
    /// Map into the application error, naming the entity kind in the message
    pub fn into_error(self, entity: &str) -> crate::Error {
        match self {
            StateError::InvalidTransition { from, event, .. } => crate::Error::Validation(format!(
                "Invalid {} transition: cannot apply '{}' event from '{}' state",
                entity, event, from
            )),
            StateError::TerminalState(state) => crate::Error::Validation(format!(
                "{} is in terminal state '{}' and cannot transition",
                entity, state
            )),
            StateError::GuardFailed(msg) => crate::Error::Validation(msg),
        }
    }
}
