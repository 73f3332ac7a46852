use std::{io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::read_to_string;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read expander config: {0}")]
    FileRead(#[from] io::Error),
    #[error("failed to deserialize expander config: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Upper bound for every single navigation data lookup.
    pub lookup_timeout_ms: u64,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 5000,
        }
    }
}

impl ExpanderConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn from_json(content: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&read_to_string(content)?)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs_err::read(path.as_ref())?)
    }
}
