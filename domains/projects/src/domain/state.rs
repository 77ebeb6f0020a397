//! State machine for the product video pipeline
//!
//! A project moves through the pipeline steps in a fixed order:
//! - Pending → ProcessingBackground → ProcessingMannequin → ProcessingScript → Rendering → Complete
//! - Any non-terminal state can fail into Error
//! - Complete and Error are terminal

pub use showreel_common::StateError;

/// Project pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectState {
    Pending,
    ProcessingBackground,
    ProcessingMannequin,
    ProcessingScript,
    Rendering,
    Complete,
    Error,
}

impl ProjectState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ProjectState] {
        match self {
            Self::Pending => &[Self::ProcessingBackground, Self::Error],
            Self::ProcessingBackground => &[Self::ProcessingMannequin, Self::Error],
            Self::ProcessingMannequin => &[Self::ProcessingScript, Self::Error],
            Self::ProcessingScript => &[Self::Rendering, Self::Error],
            Self::Rendering => &[Self::Complete, Self::Error],
            Self::Complete => &[],
            Self::Error => &[],
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::ProcessingBackground => write!(f, "processing-background"),
            Self::ProcessingMannequin => write!(f, "processing-mannequin"),
            Self::ProcessingScript => write!(f, "processing-script"),
            Self::Rendering => write!(f, "rendering"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Events that advance a project
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    /// Pipeline picked the project up
    StartProcessing,
    /// Transparent product image stored
    BackgroundRemoved,
    /// Mannequin image stored
    MannequinReady,
    /// Marketing script stored
    ScriptReady,
    /// Final video available
    VideoReady,
    /// A step failed
    Fail,
}

impl std::fmt::Display for ProjectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartProcessing => write!(f, "start_processing"),
            Self::BackgroundRemoved => write!(f, "background_removed"),
            Self::MannequinReady => write!(f, "mannequin_ready"),
            Self::ScriptReady => write!(f, "script_ready"),
            Self::VideoReady => write!(f, "video_ready"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Project state machine
pub struct ProjectStateMachine;

impl ProjectStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: ProjectState,
        event: ProjectEvent,
    ) -> Result<ProjectState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (_, ProjectEvent::Fail) => ProjectState::Error,
            (ProjectState::Pending, ProjectEvent::StartProcessing) => {
                ProjectState::ProcessingBackground
            }
            (ProjectState::ProcessingBackground, ProjectEvent::BackgroundRemoved) => {
                ProjectState::ProcessingMannequin
            }
            (ProjectState::ProcessingMannequin, ProjectEvent::MannequinReady) => {
                ProjectState::ProcessingScript
            }
            (ProjectState::ProcessingScript, ProjectEvent::ScriptReady) => ProjectState::Rendering,
            (ProjectState::Rendering, ProjectEvent::VideoReady) => ProjectState::Complete,
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

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ProjectState, event: &ProjectEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}
