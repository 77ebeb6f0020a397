//! API layer for the Try-on domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::TryOnState;
pub use routes::routes;
