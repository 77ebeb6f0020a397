//! Try-on domain types

pub mod entities;
pub mod models;
pub mod options;
pub mod presets;
pub mod prompt;
pub mod state;

pub use entities::*;
pub use options::*;
pub use state::*;
