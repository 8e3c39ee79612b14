//! Error types for the insight-client crate.

use std::{io, path::PathBuf, time::Duration};

use insight_highlight::terminal_safe;
use thiserror::Error;

/// Errors from a single request to the search service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("service returned {status}: {}", error_detail(body))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The file endpoint answered 404.
    #[error("file '{name}' not found on the service")]
    NotFound {
        /// Identifier that was requested.
        name: String,
    },

    /// Connection, protocol or decoding failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL cannot be used.
    #[error("invalid service URL '{url}': {message}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        message: String,
    },
}

/// Input validation failures detected before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The query is empty after trimming.
    #[error("enter a search query")]
    EmptyQuery,
    /// No documents were supplied.
    #[error("select at least one document to search")]
    NoDocuments,
}

/// Failures of a presenter operation, as shown to the user.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// The request was rejected before reaching the service.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The liveness probe failed; no search was submitted.
    #[error("search service unavailable: {reason}")]
    Unavailable {
        /// Why the probe failed.
        reason: String,
    },

    /// The search request was answered with a non-success status.
    #[error("search failed ({status}): {}", error_detail(body))]
    SearchFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The document is unknown to the service under both identifiers.
    #[error("file '{filename}' not found; please upload the files again")]
    NotFound {
        /// Identifier from the selected match.
        filename: String,
    },

    /// Any other service failure.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The per-call timeout elapsed.
    #[error("request timed out after {0:.1?}")]
    Timeout(Duration),

    /// The caller cancelled the operation.
    #[error("request cancelled")]
    Cancelled,

    /// A newer search was started before this one completed.
    #[error("search superseded by a newer request")]
    Superseded,
}

/// Errors while collecting local documents for upload.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A path given explicitly does not exist.
    #[error("no such file or directory: {}", path.display())]
    Missing {
        /// The missing path.
        path: PathBuf,
    },

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Extracts a human-readable message from an error body.
///
/// The service reports errors as JSON objects with an `error` or `detail` field; anything
/// else is returned trimmed. Control characters are replaced, as the message ends up on a
/// terminal.
pub fn error_detail(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return terminal_safe(message).into_owned();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "(empty response)".to_string()
    } else {
        terminal_safe(trimmed).into_owned()
    }
}
