//! Projects domain state

use crate::service::ProjectService;

/// Application state for the Projects domain
#[derive(Clone)]
pub struct ProjectsState {
    pub projects: ProjectService,
}

impl ProjectsState {
    pub fn new(projects: ProjectService) -> Self {
        Self { projects }
    }
}
