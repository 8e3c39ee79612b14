//! Configuration file parsing.
//!
//! Parses individual `.insight.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// `[service]` section.
    pub service: Option<RawServiceSettings>,
    /// `[search]` section.
    pub search: Option<RawSearchSettings>,
    /// `[relevance]` section.
    pub relevance: Option<RawRelevanceSettings>,
    /// `[highlight]` section.
    pub highlight: Option<RawHighlightSettings>,
    /// `[documents]` section.
    pub documents: Option<RawDocumentSettings>,
}

/// Raw service settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawServiceSettings {
    /// Base URL of the search service.
    pub url: Option<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Maximum results shown.
    pub limit: Option<usize>,
}

/// Raw relevance tier boundaries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRelevanceSettings {
    /// Lower bound of the very-high tier.
    pub very_high: Option<f64>,
    /// Lower bound of the high tier.
    pub high: Option<f64>,
    /// Lower bound of the medium tier.
    pub medium: Option<f64>,
    /// Lower bound of the low tier.
    pub low: Option<f64>,
}

/// Raw highlight settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHighlightSettings {
    /// Minimum query term length.
    pub min_query_term_len: Option<usize>,
    /// Minimum snippet word length for the fallback pass.
    pub min_snippet_word_len: Option<usize>,
}

/// Raw document selection settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDocumentSettings {
    /// Accepted file extensions.
    pub extensions: Option<Vec<String>>,
    /// Glob patterns of files to skip.
    pub exclude: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
