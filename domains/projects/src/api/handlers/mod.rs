//! HTTP handlers for the Projects domain

pub mod projects;
