//! HTTP handlers for the Try-on domain

pub mod generate;
pub mod tryon;
