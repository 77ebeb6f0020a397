//! Live / simulated API mode switch
//!
//! Pipelines either call the real vendors or simulate each step with
//! placeholder assets. The environment supplies the default; a runtime
//! override (set through the API) wins while present.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

const OVERRIDE_NONE: u8 = 0;
const OVERRIDE_SIMULATED: u8 = 1;
const OVERRIDE_LIVE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    Live,
    Simulated,
}

impl ApiMode {
    pub fn is_live(&self) -> bool {
        matches!(self, ApiMode::Live)
    }
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiMode::Live => write!(f, "live"),
            ApiMode::Simulated => write!(f, "simulated"),
        }
    }
}

/// Snapshot of the switch, as reported by `GET /v1/mode`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiModeStatus {
    pub mode: ApiMode,
    pub use_real_apis: bool,
    pub env_default: bool,
    #[serde(rename = "override")]
    pub override_value: Option<bool>,
}

#[derive(Debug)]
pub struct ApiModeSwitch {
    env_default: bool,
    override_value: AtomicU8,
}

impl ApiModeSwitch {
    pub fn new(env_default: bool) -> Self {
        Self {
            env_default,
            override_value: AtomicU8::new(OVERRIDE_NONE),
        }
    }

    /// Override first, then the environment default.
    pub fn use_real_apis(&self) -> bool {
        self.override_value().unwrap_or(self.env_default)
    }

    pub fn mode(&self) -> ApiMode {
        if self.use_real_apis() {
            ApiMode::Live
        } else {
            ApiMode::Simulated
        }
    }

    pub fn override_value(&self) -> Option<bool> {
        match self.override_value.load(Ordering::Acquire) {
            OVERRIDE_LIVE => Some(true),
            OVERRIDE_SIMULATED => Some(false),
            _ => None,
        }
    }

    /// Set or clear (`None`) the runtime override
    pub fn set_override(&self, value: Option<bool>) {
        let raw = match value {
            Some(true) => OVERRIDE_LIVE,
            Some(false) => OVERRIDE_SIMULATED,
            None => OVERRIDE_NONE,
        };
        let previous = self.mode();
        self.override_value.store(raw, Ordering::Release);
        tracing::info!(
            previous = %previous,
            current = %self.mode(),
            override_value = ?value,
            "API mode updated"
        );
    }

    pub fn status(&self) -> ApiModeStatus {
        ApiModeStatus {
            mode: self.mode(),
            use_real_apis: self.use_real_apis(),
            env_default: self.env_default,
            override_value: self.override_value(),
        }
    }
}

impl Default for ApiModeSwitch {
    fn default() -> Self {
        Self::new(false)
    }
}
