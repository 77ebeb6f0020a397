//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Vendor crates own their
//! own `*Config::from_env()`; this struct covers the service itself.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP port for the local server
    pub port: u16,

    /// Default API mode; a runtime override may take precedence
    pub use_real_apis: bool,

    /// Record store backend: file, memory, or postgres
    pub store_provider: String,

    /// Directory holding JSON record files for the file store
    pub data_dir: PathBuf,

    /// Postgres connection URL, required for the postgres store
    pub database_url: Option<String>,

    /// Base URL used to build links to locally served files
    pub public_base_url: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            use_real_apis: false,
            store_provider: "file".to_string(),
            data_dir: PathBuf::from("./data"),
            database_url: None,
            public_base_url: "http://localhost:3000".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();

        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            use_real_apis: parse_use_real_apis(env::var("USE_REAL_APIS").ok().as_deref()),
            store_provider: env::var("STORE_PROVIDER").unwrap_or(defaults.store_provider),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            log_format: env::var("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or_default(),
        };

        if config.store_provider == "postgres" && config.database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required when STORE_PROVIDER=postgres");
        }

        Ok(config)
    }
}

/// Only the exact string "true" enables live vendor calls.
pub fn parse_use_real_apis(value: Option<&str>) -> bool {
    value == Some("true")
}
