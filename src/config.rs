//! Configuration for schema decoding and the schema registry
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas.toml)
//! - Environment variables (SCHEMAS__*)
//!
//! ## Example config file (schemas.toml):
//! ```toml
//! [decode]
//! deny_unknown_fields = true
//!
//! [registry]
//! log_overwrites = false
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Decoding settings
    #[serde(default)]
    pub decode: DecodeConfig,

    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// How schema payloads are decoded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Reject top-level fields other than id, name, description, attributes
    #[serde(default)]
    pub deny_unknown_fields: bool,
}

impl DecodeConfig {
    /// Strict decoding
    pub fn strict() -> Self {
        Self { deny_unknown_fields: true }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Emit a debug event when registering replaces a schema with different content
    #[serde(default = "default_true")]
    pub log_overwrites: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { log_overwrites: true }
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, additionally reading a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schemas.toml",
            ".schemas.toml",
            "config/schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(xdg_config) = Self::user_config_path() {
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // SCHEMAS__DECODE__DENY_UNKNOWN_FIELDS=true
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Platform config file location, if one can be determined
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "familiar", "schemas")
            .map(|dirs| dirs.config_dir().join("schemas.toml"))
    }
}
