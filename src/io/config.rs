//! Editor configuration file.
//!
//! A config is a JSON object:
//!
//! ```json
//! {
//!   "input": "photo.png",
//!   "output": "out/photo.png",
//!   "display": false,
//!   "overwrite": false,
//!   "operations": [
//!     {"type": "blur", "width": 3, "height": 3},
//!     {"type": "brightness", "value": 1.2}
//!   ]
//! }
//! ```

use crate::core::error::ConfigError;
use crate::core::types::RawDescriptor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one editing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Image to load. Required.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Where to write the result.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Whether the result should be shown on screen.
    #[serde(default)]
    pub display: bool,
    /// Replace an existing output file instead of picking a fresh name.
    #[serde(default)]
    pub overwrite: bool,
    /// Operation descriptors, applied in order.
    #[serde(default)]
    pub operations: Vec<RawDescriptor>,
}

impl EditorConfig {
    /// Read, parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.is_none() {
            return Err(ConfigError::MissingField("input"));
        }
        if self.output_path().is_none() && !self.display {
            return Err(ConfigError::NoOutputTarget);
        }
        Ok(())
    }

    /// Input path.
    pub fn input_path(&self) -> Result<&Path, ConfigError> {
        self.input
            .as_deref()
            .ok_or(ConfigError::MissingField("input"))
    }

    /// Output path; an empty string counts as absent.
    pub fn output_path(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
