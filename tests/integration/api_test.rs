//! API endpoint integration tests
//!
//! Drives the composed router with `oneshot` on mock vendors and an
//! in-memory store: app routes, projects, and try-on.

#![allow(dead_code)]

mod app;
mod common;
mod projects;
mod tryon;
