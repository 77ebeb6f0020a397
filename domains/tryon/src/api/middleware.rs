//! Try-on domain state

use crate::service::TryOnService;

/// Application state for the Try-on domain
#[derive(Clone)]
pub struct TryOnState {
    pub tryon: TryOnService,
}

impl TryOnState {
    pub fn new(tryon: TryOnService) -> Self {
        Self { tryon }
    }
}
