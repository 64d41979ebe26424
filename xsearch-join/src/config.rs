//! Join settings.
//!
//! Read from the `[join]` table of a TOML settings file:
//!
//! ```toml
//! [join]
//! max_join_rows = 5000
//! param_prefix = "j."
//! log_timings = true
//! ```
//!
//! Every key is optional; a missing table means defaults.

use crate::error::{JoinError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cap on the rows one join may produce.
pub const DEFAULT_MAX_JOIN_ROWS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Row cap handed to every merge by [`JoinOrchestrator::apply_all`].
    ///
    /// [`JoinOrchestrator::apply_all`]: crate::JoinOrchestrator::apply_all
    pub max_join_rows: usize,

    /// Prepended to every join parameter key (`<prefix>jq0`, `<prefix>jq0.fq`, ...).
    pub param_prefix: String,

    /// Log the timer tree at debug level after each `apply_all`.
    pub log_timings: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            max_join_rows: DEFAULT_MAX_JOIN_ROWS,
            param_prefix: String::new(),
            log_timings: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    join: Option<JoinConfig>,
}

impl JoinConfig {
    /// Parse settings from TOML text. Tables other than `[join]` are ignored.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: SettingsFile = toml::from_str(content).map_err(|e| JoinError::Config {
            message: e.to_string(),
        })?;
        Ok(file.join.unwrap_or_default())
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "join settings loaded");
        Ok(config)
    }
}
