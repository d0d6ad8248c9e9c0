//! Storefront configuration: shape, validation, loading.
//!
//! Validation runs over the raw parsed value BEFORE typed deserialization
//! and accumulates every violation instead of stopping at the first, so a
//! broken config reports everything wrong with it in one pass.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use forge_commerce::adapter::AdapterConfig;

use crate::cache::CacheConfig;

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    /// One line per accumulated violation.
    #[error("Invalid configuration:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

/// Theme selection: a mandatory core theme, an optional child overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub core: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,
}

/// Top-level storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreForgeConfig {
    pub adapter: AdapterConfig,
    #[serde(default)]
    pub modules: Vec<String>,
    pub theme: ThemeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub options: std::collections::HashMap<String, serde_json::Value>,
}

/// The outcome of structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate the raw config shape, accumulating all violations.
pub fn validate_config(raw: &serde_json::Value) -> ValidationReport {
    let mut errors = Vec::new();

    match raw.get("adapter") {
        None => errors.push("Adapter configuration is required".to_string()),
        Some(adapter) => {
            if adapter.get("name").and_then(|v| v.as_str()).unwrap_or("").is_empty() {
                errors.push("Adapter name is required".to_string());
            }
            if adapter
                .get("endpoint")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .is_empty()
            {
                errors.push("Adapter endpoint is required".to_string());
            }
        }
    }

    if let Some(modules) = raw.get("modules") {
        if !modules.is_array() {
            errors.push("Modules must be an array".to_string());
        }
    }

    let theme_core = raw
        .get("theme")
        .and_then(|t| t.get("core"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if theme_core.is_empty() {
        errors.push("Theme core configuration is required".to_string());
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Parse TOML text into config, validating the raw shape first.
pub fn parse_config(text: &str) -> Result<StoreForgeConfig, ConfigError> {
    let raw: toml::Value = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let raw_json =
        serde_json::to_value(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let report = validate_config(&raw_json);
    if !report.valid {
        return Err(ConfigError::Invalid(report.errors));
    }

    serde_json::from_value(raw_json).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read and parse a config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<StoreForgeConfig, ConfigError> {
    let text =
        std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read(e.to_string()))?;
    parse_config(&text)
}
