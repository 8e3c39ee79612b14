//! Glob pattern compilation for document excludes.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::ConfigError;

/// Compiles exclude patterns into a single matcher.
///
/// An empty pattern list yields a matcher that matches nothing.
pub fn compile_excludes(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_nothing() {
        let set = compile_excludes(&[]).unwrap();
        assert!(!set.is_match("notes/plan.txt"));
    }

    #[test]
    fn test_matches_nested_paths() {
        let set = compile_excludes(&["**/drafts/**".to_string()]).unwrap();
        assert!(set.is_match("docs/drafts/wip.md"));
        assert!(!set.is_match("docs/final/done.md"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = compile_excludes(&["a[".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "a["));
    }
}
