//! Collecting local files for upload.
//!
//! Explicit files are uploaded under their file name. Directories are walked recursively and
//! each file is uploaded under its path relative to the directory's parent, so
//! `insight search q notes/` uploads `notes/plan.txt`.

use std::{
    collections::HashSet,
    ffi::OsStr,
    fs,
    path::{Component, Path, PathBuf},
};

use globset::GlobSet;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::DocumentError;

/// One document to submit, as a multipart `files` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// Filename reported to the service; may contain `/`.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Creates an upload from in-memory contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Decides which files are eligible for upload.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Lowercase extensions without a leading dot; empty accepts every extension.
    extensions: Vec<String>,
    /// Patterns matched against upload names of walked files.
    exclude: GlobSet,
}

impl DocumentFilter {
    /// Creates a filter from normalized extensions and compiled exclude patterns.
    pub fn new(extensions: Vec<String>, exclude: GlobSet) -> Self {
        Self {
            extensions,
            exclude,
        }
    }

    /// Whether `path` has an accepted extension.
    pub fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
    }

    /// Whether an upload name matches an exclude pattern.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.is_match(name)
    }
}

/// Reads every eligible file under `paths`.
///
/// Explicit files with an unsupported extension and walked files that are hidden, excluded
/// or unsupported are skipped with a log message. A path that does not exist is an error.
pub fn collect_documents(
    paths: &[PathBuf],
    filter: &DocumentFilter,
) -> Result<Vec<DocumentUpload>, DocumentError> {
    let mut uploads = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        if path.is_dir() {
            collect_dir(path, filter, &mut seen, &mut uploads)?;
        } else if path.is_file() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            if !filter.accepts_extension(path) {
                warn!(path = %path.display(), "skipping file with unsupported extension");
                continue;
            }
            push_file(path, name, &mut seen, &mut uploads)?;
        } else {
            return Err(DocumentError::Missing { path: path.clone() });
        }
    }

    Ok(uploads)
}

/// Walks one directory.
fn collect_dir(
    root: &Path,
    filter: &DocumentFilter,
    seen: &mut HashSet<String>,
    uploads: &mut Vec<DocumentUpload>,
) -> Result<(), DocumentError> {
    let prefix = root
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .next_back();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = upload_name(prefix.as_deref(), rel);

        if filter.is_excluded(&name) {
            debug!(%name, "excluded by pattern");
            continue;
        }
        if !filter.accepts_extension(entry.path()) {
            debug!(%name, "unsupported extension");
            continue;
        }
        push_file(entry.path(), name, seen, uploads)?;
    }
    Ok(())
}

/// Reads a file into `uploads` unless its name was already taken.
fn push_file(
    path: &Path,
    name: String,
    seen: &mut HashSet<String>,
    uploads: &mut Vec<DocumentUpload>,
) -> Result<(), DocumentError> {
    if !seen.insert(name.clone()) {
        warn!(%name, path = %path.display(), "skipping duplicate document name");
        return Ok(());
    }
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    uploads.push(DocumentUpload { name, bytes });
    Ok(())
}

/// Joins a directory prefix and a relative path with `/`.
fn upload_name(prefix: Option<&str>, rel: &Path) -> String {
    prefix
        .into_iter()
        .map(str::to_string)
        .chain(rel.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        }))
        .collect::<Vec<_>>()
        .join("/")
}

/// Checks if a filename represents a hidden file (starts with '.').
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}
