//! Shared utilities, configuration, and error handling for ShowReel
//!
//! This crate provides common functionality used across the ShowReel services:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - The live/simulated API mode switch
//! - Vendor polling with backoff
//! - Record stores (memory, JSON file, Postgres)

pub mod config;
pub mod error;
pub mod extractors;
pub mod files;
pub mod mode;
pub mod poll;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use files::{clean_file_name, read_image_field, ImageUpload, MAX_IMAGE_BYTES};
pub use mode::{ApiMode, ApiModeStatus, ApiModeSwitch};
pub use poll::{poll_until, Backoff, PollError, PollOutcome, PollPolicy, PollStatus};
pub use state::StateError;
pub use store::{Record, RecordStore, RepositoryError, StoreBackend};
