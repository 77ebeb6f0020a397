//! Project domain: entities, state machine, catalog, and overlay

pub mod catalog;
pub mod entities;
pub mod overlay;
pub mod state;

pub use entities::*;
pub use state::*;
