//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use globset::Glob;

use crate::{Config, DEFAULT_EXTENSIONS, RelevanceSettings};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// The service URL is not an absolute http(s) URL.
    InvalidServiceUrl {
        /// The configured URL.
        url: String,
    },
    /// A relevance boundary lies outside [0, 1].
    ThresholdOutOfRange {
        /// Name of the boundary.
        name: &'static str,
        /// Its value.
        value: f64,
    },
    /// Relevance boundaries are not strictly descending from very_high to low.
    ThresholdsOutOfOrder,
    /// A highlight length limit is zero, which would highlight every character.
    ZeroTermLength {
        /// Name of the setting.
        name: &'static str,
    },
    /// An extension the service cannot extract text from.
    UnsupportedExtension {
        /// The extension.
        extension: String,
    },
    /// An exclude pattern does not compile.
    InvalidExcludePattern {
        /// The pattern.
        pattern: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidServiceUrl { url } => {
                write!(f, "service url is not an http(s) URL: {url}")
            }
            Self::ThresholdOutOfRange { name, value } => {
                write!(f, "relevance.{name} = {value} is outside 0.0-1.0")
            }
            Self::ThresholdsOutOfOrder => {
                write!(
                    f,
                    "relevance thresholds must descend: very_high > high > medium > low"
                )
            }
            Self::ZeroTermLength { name } => {
                write!(f, "highlight.{name} is zero")
            }
            Self::UnsupportedExtension { extension } => {
                write!(f, "extension '{extension}' is not supported by the service")
            }
            Self::InvalidExcludePattern { pattern } => {
                write!(f, "exclude pattern '{pattern}' is not a valid glob")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if !is_http_url(&config.service.url) {
        warnings.push(ConfigWarning::InvalidServiceUrl {
            url: config.service.url.clone(),
        });
    }

    warnings.extend(validate_relevance(&config.relevance));

    if config.highlight.min_query_term_len == 0 {
        warnings.push(ConfigWarning::ZeroTermLength {
            name: "min_query_term_len",
        });
    }
    if config.highlight.min_snippet_word_len == 0 {
        warnings.push(ConfigWarning::ZeroTermLength {
            name: "min_snippet_word_len",
        });
    }

    for ext in &config.documents.extensions {
        if !DEFAULT_EXTENSIONS.contains(&ext.as_str()) {
            warnings.push(ConfigWarning::UnsupportedExtension {
                extension: ext.clone(),
            });
        }
    }

    for pattern in &config.documents.exclude {
        if Glob::new(pattern).is_err() {
            warnings.push(ConfigWarning::InvalidExcludePattern {
                pattern: pattern.clone(),
            });
        }
    }

    warnings
}

/// Checks the shape of an http(s) URL without resolving it.
fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    rest.is_some_and(|r| {
        let host = r.split(['/', '?', '#']).next().unwrap_or_default();
        !host.is_empty() && !host.contains(char::is_whitespace)
    })
}

/// Checks range and ordering of the tier boundaries.
fn validate_relevance(relevance: &RelevanceSettings) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let mut bounds = Vec::with_capacity(4);
    if let Some(v) = relevance.very_high {
        bounds.push(("very_high", v));
    }
    bounds.push(("high", relevance.high));
    bounds.push(("medium", relevance.medium));
    bounds.push(("low", relevance.low));

    for &(name, value) in &bounds {
        if !(0.0..=1.0).contains(&value) {
            warnings.push(ConfigWarning::ThresholdOutOfRange { name, value });
        }
    }

    if bounds.windows(2).any(|w| w[0].1 <= w[1].1) {
        warnings.push(ConfigWarning::ThresholdsOutOfOrder);
    }

    warnings
}
