//! State machine for try-on generations
//!
//! - Pending → Processing → Complete
//! - Processing → Enhancing → Complete when enhancement was requested
//! - Any non-terminal state can fail into Error

pub use showreel_common::StateError;

/// Generation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationState {
    Pending,
    Processing,
    Enhancing,
    Complete,
    Error,
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    pub fn valid_transitions(&self) -> &'static [GenerationState] {
        match self {
            Self::Pending => &[Self::Processing, Self::Error],
            Self::Processing => &[Self::Enhancing, Self::Complete, Self::Error],
            Self::Enhancing => &[Self::Complete, Self::Error],
            Self::Complete => &[],
            Self::Error => &[],
        }
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Enhancing => write!(f, "enhancing"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Events that advance a generation
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    StartProcessing,
    StartEnhancing,
    Finish,
    Fail,
}

impl std::fmt::Display for GenerationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartProcessing => write!(f, "start_processing"),
            Self::StartEnhancing => write!(f, "start_enhancing"),
            Self::Finish => write!(f, "finish"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

pub struct GenerationStateMachine;

impl GenerationStateMachine {
    pub fn transition(
        current: GenerationState,
        event: GenerationEvent,
    ) -> Result<GenerationState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (_, GenerationEvent::Fail) => GenerationState::Error,
            (GenerationState::Pending, GenerationEvent::StartProcessing) => {
                GenerationState::Processing
            }
            (GenerationState::Processing, GenerationEvent::StartEnhancing) => {
                GenerationState::Enhancing
            }
            (GenerationState::Processing | GenerationState::Enhancing, GenerationEvent::Finish) => {
                GenerationState::Complete
            }
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: "unknown".to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    pub fn can_transition(current: GenerationState, event: &GenerationEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}
