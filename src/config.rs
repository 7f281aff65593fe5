//! Index configuration
//!
//! Configuration only affects how an index is built and observed, never what
//! the queries return.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading an [`IndexConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has wrongly typed fields
    #[error("Invalid index configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Build-time configuration for a `StudentIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Emit structured build events (default: true)
    #[serde(default = "default_log_events")]
    pub log_events: bool,

    /// Number of records the caller expects; used to pre-size the id map
    #[serde(default)]
    pub expected_records: Option<usize>,
}

fn default_log_events() -> bool {
    true
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            log_events: default_log_events(),
            expected_records: None,
        }
    }
}

impl IndexConfig {
    /// Parse a configuration from a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config with build events turned off.
    pub fn quiet() -> Self {
        Self {
            log_events: false,
            ..Default::default()
        }
    }

    /// Set the expected record count.
    pub fn with_expected_records(mut self, expected: usize) -> Self {
        self.expected_records = Some(expected);
        self
    }
}
