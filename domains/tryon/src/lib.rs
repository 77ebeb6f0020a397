//! Try-on domain: fashion model images from flat-lay clothing photos

pub mod api;
pub mod domain;
pub mod generation;
pub mod pipeline;
pub mod service;

pub use api::{routes, TryOnState};
pub use domain::entities::{GenerationProject, GenerationStatus, TryOnCreationParams};
pub use domain::options::{BackgroundOptions, CameraOptions, ClothingType, ModelOptions};
pub use domain::state::{GenerationEvent, GenerationState, GenerationStateMachine};
pub use generation::{generate_model_image, model_input, virtual_try_on, GeneratedImage};
pub use pipeline::{TryOnPipeline, TryOnServices, TryOnTimings};
pub use service::TryOnService;
