//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use std::path::PathBuf;

use crate::{
    Config, DocumentSettings, HighlightSettings, RelevanceSettings, SearchSettings,
    ServiceSettings,
    parse::{
        RawConfig, RawDocumentSettings, RawHighlightSettings, RawRelevanceSettings,
        RawSearchSettings, RawServiceSettings,
    },
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Lists (`extensions`, `exclude`): replaced wholesale by the highest-precedence definition
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut config = Config {
        config_root: configs
            .first()
            .and_then(|c| c.path.parent())
            .map(PathBuf::from),
        ..Config::default()
    };

    // Lowest precedence first so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(ref v) = raw.service {
            apply_service(&mut config.service, v);
        }
        if let Some(ref v) = raw.search {
            apply_search(&mut config.search, v);
        }
        if let Some(ref v) = raw.relevance {
            apply_relevance(&mut config.relevance, v);
        }
        if let Some(ref v) = raw.highlight {
            apply_highlight(&mut config.highlight, v);
        }
        if let Some(ref v) = raw.documents {
            apply_documents(&mut config.documents, v);
        }
    }

    config
}

/// Applies raw service settings, overwriting any present values.
fn apply_service(result: &mut ServiceSettings, raw: &RawServiceSettings) {
    if let Some(ref v) = raw.url {
        result.url.clone_from(v);
    }
    if let Some(v) = raw.timeout_secs {
        result.timeout_secs = v;
    }
}

/// Applies raw search settings.
fn apply_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
}

/// Applies raw relevance boundaries.
fn apply_relevance(result: &mut RelevanceSettings, raw: &RawRelevanceSettings) {
    if raw.very_high.is_some() {
        result.very_high = raw.very_high;
    }
    if let Some(v) = raw.high {
        result.high = v;
    }
    if let Some(v) = raw.medium {
        result.medium = v;
    }
    if let Some(v) = raw.low {
        result.low = v;
    }
}

/// Applies raw highlight settings.
fn apply_highlight(result: &mut HighlightSettings, raw: &RawHighlightSettings) {
    if let Some(v) = raw.min_query_term_len {
        result.min_query_term_len = v;
    }
    if let Some(v) = raw.min_snippet_word_len {
        result.min_snippet_word_len = v;
    }
}

/// Applies raw document settings. Extensions are normalized to lowercase without a dot.
fn apply_documents(result: &mut DocumentSettings, raw: &RawDocumentSettings) {
    if let Some(ref v) = raw.extensions {
        result.extensions = v
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
    }
    if let Some(ref v) = raw.exclude {
        result.exclude.clone_from(v);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parse::parse_config_str;

    /// Builds a `ParsedConfig` from TOML text.
    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty_is_default() {
        let config = merge_configs(&[]);
        assert_eq!(config.service, ServiceSettings::default());
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_closest_config_wins() {
        let local = parsed("/work/project/.insight.toml", "[service]\nurl = \"http://a\"\n");
        let global = parsed(
            "/home/me/.insight.toml",
            "[service]\nurl = \"http://b\"\ntimeout_secs = 7\n",
        );

        let config = merge_configs(&[local, global]);
        assert_eq!(config.service.url, "http://a");
        assert_eq!(config.service.timeout_secs, 7);
        assert_eq!(config.config_root, Some(PathBuf::from("/work/project")));
    }

    #[test]
    fn test_relevance_fields_merge_independently() {
        let local = parsed("/p/.insight.toml", "[relevance]\nlow = 0.1\n");
        let global = parsed("/h/.insight.toml", "[relevance]\nhigh = 0.6\nvery_high = 0.8\n");

        let config = merge_configs(&[local, global]);
        assert_eq!(config.relevance.low, 0.1);
        assert_eq!(config.relevance.high, 0.6);
        assert_eq!(config.relevance.medium, 0.3);
        assert_eq!(config.relevance.very_high, Some(0.8));
    }

    #[test]
    fn test_extensions_are_normalized() {
        let local = parsed(
            "/p/.insight.toml",
            "[documents]\nextensions = [\".TXT\", \" md \", \"\"]\n",
        );
        let config = merge_configs(&[local]);
        assert_eq!(config.documents.extensions, vec!["txt", "md"]);
    }

    #[test]
    fn test_list_replaced_not_appended() {
        let local = parsed("/p/.insight.toml", "[documents]\nexclude = [\"a/**\"]\n");
        let global = parsed("/h/.insight.toml", "[documents]\nexclude = [\"b/**\"]\n");
        let config = merge_configs(&[local, global]);
        assert_eq!(config.documents.exclude, vec!["a/**"]);
    }
}
