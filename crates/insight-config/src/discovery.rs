//! Locating `.insight.toml` files.
//!
//! Every ancestor of the working directory may hold a config file. The nearest ones take
//! precedence, and the home directory file comes last.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".insight.toml";

/// Lists the config files that apply to `cwd`, nearest first.
///
/// A file with `root = true` ends the list: nothing above it is read, including
/// `~/.insight.toml`.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut chain = Vec::new();
    for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
        if !candidate.is_file() {
            continue;
        }
        let stops = is_root_config(&candidate);
        chain.push(candidate);
        if stops {
            return chain;
        }
    }

    if let Some(home) = global_config_path().filter(|p| p.is_file() && !chain.contains(p)) {
        chain.push(home);
    }
    chain
}

/// Path of the per-user config file, `None` without a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// True if `path` is the per-user config file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// Writes `content` as the config file of `dir` (relative to `tree`), returning its path.
    fn write_config(tree: &TempDir, dir: &str, content: &str) -> PathBuf {
        let dir = tree.path().join(dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    /// Creates `dir` under `tree`, returning its path.
    fn mkdir(tree: &TempDir, dir: &str) -> PathBuf {
        let path = tree.path().join(dir);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Drops the real home config, which may exist where the tests run.
    fn without_home(chain: Vec<PathBuf>) -> Vec<PathBuf> {
        chain.into_iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn empty_tree_has_no_configs() {
        let tree = TempDir::new().unwrap();
        let cwd = mkdir(&tree, "docs/2024/q1");
        assert!(without_home(discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn nearest_config_comes_first() {
        let tree = TempDir::new().unwrap();
        let outer = write_config(&tree, "", "[search]\nlimit = 5\n");
        let inner = write_config(&tree, "notes", "[search]\nlimit = 20\n");
        let cwd = mkdir(&tree, "notes/drafts");

        assert_eq!(without_home(discover_config_files(&cwd)), vec![inner, outer]);
    }

    #[test]
    fn config_in_cwd_itself_is_found() {
        let tree = TempDir::new().unwrap();
        let here = write_config(&tree, "notes", "");

        let cwd = tree.path().join("notes");
        assert_eq!(without_home(discover_config_files(&cwd)), vec![here]);
    }

    #[test]
    fn root_config_ends_the_chain() {
        let tree = TempDir::new().unwrap();
        write_config(&tree, "", "# outer\n");
        let root = write_config(&tree, "notes", "root = true\n");
        let cwd = mkdir(&tree, "notes/drafts");

        // The home config is skipped too, so no filtering is needed.
        assert_eq!(discover_config_files(&cwd), vec![root]);
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let tree = TempDir::new().unwrap();
        mkdir(&tree, CONFIG_FILENAME);
        let cwd = mkdir(&tree, "notes");
        assert!(without_home(discover_config_files(&cwd)).is_empty());
    }
}
