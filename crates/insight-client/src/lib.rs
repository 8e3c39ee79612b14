//! Client side of insight's remote semantic search.
//!
//! - [`model`]: wire types returned by the service.
//! - [`relevance`]: score tiers and confidence colors.
//! - [`service`]: the [`SearchService`] interface and its HTTP implementation.
//! - [`documents`]: collecting local files for upload.
//! - [`presenter`]: the search and view round-trips.

#![warn(missing_docs)]

pub mod documents;
mod error;
pub mod model;
pub mod presenter;
pub mod relevance;
pub mod service;

pub use documents::{DocumentFilter, DocumentUpload, collect_documents};
pub use error::{DocumentError, PresenterError, ServiceError, ValidationError, error_detail};
pub use model::{ConfidenceLevel, FullDocument, ScoredMatch, ServiceStatus};
pub use presenter::{
    CallOptions, ClassifiedMatch, DocumentView, Presenter, SearchOutcome, bare_filename,
};
pub use relevance::{RelevanceThresholds, RelevanceTier, Swatch, classify, confidence_color};
pub use service::{HttpService, SearchService};
