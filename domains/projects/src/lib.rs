//! Projects domain: product photo to marketing video

pub mod api;
pub mod domain;
pub mod pipeline;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use api::{routes, ProjectsState};
pub use domain::entities::{
    MannequinImage, Project, ProjectCreationParams, ProjectStatus, Script,
};
pub use domain::state::{ProjectEvent, ProjectState, ProjectStateMachine, StateError};
pub use pipeline::{
    mannequin_policy, DelayRange, PipelineServices, ProjectPipeline, SimulationTimings,
};
pub use service::ProjectService;
