//! Configuration system for insight.
//!
//! insight uses TOML configuration files named `.insight.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.insight.toml` files found, then loading `~/.insight.toml` as the global config with lowest
//! precedence. Environment variables are applied last and override every file.

#![warn(missing_docs)]

mod discovery;
mod env;
mod error;
mod merge;
mod parse;
mod patterns;
mod templates;
mod validate;

use std::{
    env::var,
    path::{Path, PathBuf},
    time::Duration,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use env::{ENV_SERVICE_URL, ENV_TIMEOUT_SECS, apply_env_overrides};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawDocumentSettings, RawHighlightSettings, RawRelevanceSettings, RawSearchSettings,
    RawServiceSettings, parse_config_file, parse_config_str,
};
pub use patterns::compile_excludes;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for insight.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.insight.toml` files and applying environment overrides.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Remote search service settings.
    pub service: ServiceSettings,
    /// Result listing settings.
    pub search: SearchSettings,
    /// Relevance tier boundaries.
    pub relevance: RelevanceSettings,
    /// Highlighting token limits.
    pub highlight: HighlightSettings,
    /// Which local files are uploaded.
    pub documents: DocumentSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.insight.toml` files, then
    /// applying overrides from the process environment.
    ///
    /// Returns the defaults (plus environment overrides) if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        let mut config = Self::load_from_files(&config_files)?;
        apply_env_overrides(&mut config, |key| var(key).ok())?;
        Ok(config)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first. Environment
    /// overrides are not applied.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            service: &self.service,
            search: &self.search,
            relevance: &self.relevance,
            highlight: &self.highlight,
            documents: &self.documents,
        };
        toml::to_string_pretty(&serializable).unwrap_or_default()
    }
}

/// Default base URL of the remote search service.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Remote service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the search service.
    pub url: String,
    /// Per-call timeout in seconds. Zero disables the timeout.
    pub timeout_secs: u64,
}

impl ServiceSettings {
    /// Returns the per-call timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Result listing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum results shown. Zero shows everything the service returns.
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// Inclusive lower bounds of each relevance tier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelevanceSettings {
    /// Lower bound of the "very high" tier. Unset disables the tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub very_high: Option<f64>,
    /// Lower bound of the "high" tier.
    pub high: f64,
    /// Lower bound of the "medium" tier.
    pub medium: f64,
    /// Lower bound of the "low" tier. Anything below is minimal.
    pub low: f64,
}

impl Default for RelevanceSettings {
    fn default() -> Self {
        Self {
            very_high: None,
            high: 0.5,
            medium: 0.3,
            low: 0.15,
        }
    }
}

/// Token length limits for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Minimum character length of a query term to be highlighted.
    pub min_query_term_len: usize,
    /// Minimum character length of a snippet word in the fallback pass.
    pub min_snippet_word_len: usize,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            min_query_term_len: 3,
            min_snippet_word_len: 4,
        }
    }
}

/// File extensions the service can extract text from.
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "pdf", "md", "docx"];

/// Settings controlling which local files are uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Accepted file extensions (lowercase, without the dot).
    pub extensions: Vec<String>,
    /// Glob patterns of files to skip.
    pub exclude: Vec<String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            exclude: Vec::new(),
        }
    }
}

/// Borrowed view of the settings for TOML serialization.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Service settings.
    service: &'a ServiceSettings,
    /// Search settings.
    search: &'a SearchSettings,
    /// Relevance settings.
    relevance: &'a RelevanceSettings,
    /// Highlight settings.
    highlight: &'a HighlightSettings,
    /// Document settings.
    documents: &'a DocumentSettings,
}
