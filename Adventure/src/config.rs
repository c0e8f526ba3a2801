//! Loader configuration
//!
//! Settings are read from TOML:
//!
//! ```toml
//! [parser]
//! strip_bom = true
//! trim_trailing_whitespace = false
//! strict_branches = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdventureConfig {
    pub parser: ParseOptions,
}

/// Options for [`crate::StoryTreeParser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Drop a leading UTF-8 byte order mark from the first line.
    pub strip_bom: bool,
    /// Trim trailing whitespace before a line is classified.
    pub trim_trailing_whitespace: bool,
    /// Reject internal nodes that offer no choice instead of warning.
    pub strict_branches: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_bom: true,
            trim_trailing_whitespace: false,
            strict_branches: false,
        }
    }
}

impl AdventureConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
