//! The search and view round-trips.
//!
//! A [`Presenter`] validates input, talks to a [`SearchService`], classifies results and
//! annotates fetched documents. It keeps no presentation state: every operation returns an
//! immutable value the caller renders however it likes.

use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use insight_highlight::{AnnotatedContent, HighlightEngine, HighlightOptions};
use serde::Serialize;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    documents::DocumentUpload,
    error::{PresenterError, ServiceError, ValidationError},
    model::{ConfidenceLevel, FullDocument, ScoredMatch, ServiceStatus},
    relevance::{RelevanceThresholds, RelevanceTier, Swatch, confidence_color},
    service::SearchService,
};

/// Per-call limits for presenter operations.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Abort with [`PresenterError::Timeout`] after this long.
    pub timeout: Option<Duration>,
    /// Abort with [`PresenterError::Cancelled`] once triggered.
    pub cancel: CancellationToken,
}

impl CallOptions {
    /// Options with a timeout and a fresh cancellation token.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            cancel: CancellationToken::new(),
        }
    }
}

/// A search result with its derived relevance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedMatch {
    /// 1-based position in service order.
    pub rank: usize,
    /// The result as received.
    #[serde(flatten)]
    pub scored: ScoredMatch,
    /// Tier derived from the score.
    pub tier: RelevanceTier,
}

impl ClassifiedMatch {
    /// Confidence label, `Unknown` when the service sent none.
    pub fn confidence(&self) -> ConfidenceLevel {
        self.scored.confidence()
    }

    /// Color for the confidence label.
    pub fn confidence_color(&self) -> Swatch {
        confidence_color(self.confidence())
    }

    /// Score as a percentage.
    pub fn score_percent(&self) -> f64 {
        self.scored.similarity_score * 100.0
    }
}

/// The result of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// The submitted query.
    query: String,
    /// Results in service order.
    matches: Vec<ClassifiedMatch>,
}

impl SearchOutcome {
    /// The submitted query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results in service order.
    pub fn matches(&self) -> &[ClassifiedMatch] {
        &self.matches
    }

    /// Looks up a result by its 1-based rank.
    pub fn get(&self, rank: usize) -> Option<&ClassifiedMatch> {
        rank.checked_sub(1).and_then(|i| self.matches.get(i))
    }

    /// Whether the service returned nothing.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// A fetched and annotated document, ready to render.
#[derive(Debug, Clone)]
pub struct DocumentView {
    /// Identifier from the selected match.
    pub filename: String,
    /// Identifier the document was actually fetched under.
    pub fetched_as: String,
    /// Similarity score of the selected match.
    pub similarity_score: f64,
    /// Tier derived from the score.
    pub tier: RelevanceTier,
    /// Confidence label of the selected match.
    pub confidence: ConfidenceLevel,
    /// How the service found the match, if reported.
    pub match_type: Option<String>,
    /// Raw document text.
    pub content: String,
    /// Escaped and highlighted document.
    pub annotated: AnnotatedContent,
}

/// Drives searches and document views against a service.
#[derive(Debug)]
pub struct Presenter<S> {
    /// Backend.
    service: S,
    /// Tier boundaries.
    thresholds: RelevanceThresholds,
    /// Document annotator.
    engine: HighlightEngine,
    /// Ticket of the most recent search.
    latest: AtomicU64,
}

impl<S: SearchService> Presenter<S> {
    /// Creates a presenter with default thresholds and highlight options.
    pub fn new(service: S) -> Self {
        Self {
            service,
            thresholds: RelevanceThresholds::default(),
            engine: HighlightEngine::default(),
            latest: AtomicU64::new(0),
        }
    }

    /// Replaces the tier boundaries.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: RelevanceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replaces the highlight options.
    #[must_use]
    pub fn with_highlight_options(mut self, options: HighlightOptions) -> Self {
        self.engine = HighlightEngine::new(options);
        self
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The tier boundaries in use.
    pub fn thresholds(&self) -> &RelevanceThresholds {
        &self.thresholds
    }

    /// Checks that the service is up.
    pub async fn probe(&self, options: &CallOptions) -> Result<ServiceStatus, PresenterError> {
        guard(options, self.probe_once()).await
    }

    /// Probes the service, submits the query, and classifies the ranked results.
    ///
    /// Input is validated before any request. If the probe fails no search is submitted. A
    /// search that completes after a newer one was started fails with
    /// [`PresenterError::Superseded`].
    pub async fn run_search(
        &self,
        query: &str,
        documents: &[DocumentUpload],
        options: &CallOptions,
    ) -> Result<SearchOutcome, PresenterError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        if documents.is_empty() {
            return Err(ValidationError::NoDocuments.into());
        }

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let result = guard(options, self.submit(query, documents)).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "discarding stale search result");
            return Err(PresenterError::Superseded);
        }

        let matches = result?
            .into_iter()
            .enumerate()
            .map(|(i, scored)| ClassifiedMatch {
                rank: i + 1,
                tier: self.thresholds.classify(scored.similarity_score),
                scored,
            })
            .collect::<Vec<_>>();
        info!(results = matches.len(), "search complete");

        Ok(SearchOutcome {
            query: query.to_string(),
            matches,
        })
    }

    /// Fetches the document behind `selected` and highlights it for `query`.
    ///
    /// The bare filename is tried first; on not-found the full identifier is tried once.
    pub async fn view_document(
        &self,
        selected: &ScoredMatch,
        query: &str,
        options: &CallOptions,
    ) -> Result<DocumentView, PresenterError> {
        let (document, fetched_as) = guard(options, self.fetch(&selected.filename)).await?;
        let annotated = self
            .engine
            .highlight(&document.content, &selected.content_snippet, query);
        debug!(
            filename = %selected.filename,
            stage = annotated.stage().description(),
            "annotated document"
        );

        Ok(DocumentView {
            filename: selected.filename.clone(),
            fetched_as,
            similarity_score: selected.similarity_score,
            tier: self.thresholds.classify(selected.similarity_score),
            confidence: selected.confidence(),
            match_type: selected.match_type.clone(),
            content: document.content,
            annotated,
        })
    }

    /// One status request, failures reported as unavailability.
    async fn probe_once(&self) -> Result<ServiceStatus, PresenterError> {
        self.service
            .status()
            .await
            .map_err(|e| PresenterError::Unavailable {
                reason: e.to_string(),
            })
    }

    /// Probe then search.
    async fn submit(
        &self,
        query: &str,
        documents: &[DocumentUpload],
    ) -> Result<Vec<ScoredMatch>, PresenterError> {
        let status = self.probe_once().await?;
        debug!(
            files_loaded = ?status.files_loaded,
            model_loaded = ?status.model_loaded,
            "service is up"
        );

        self.service
            .search(query, documents)
            .await
            .map_err(|e| match e {
                ServiceError::Status { status, body } => {
                    PresenterError::SearchFailed { status, body }
                }
                other => other.into(),
            })
    }

    /// Fetches by bare filename, retrying once with the full identifier.
    async fn fetch(&self, filename: &str) -> Result<(FullDocument, String), PresenterError> {
        let bare = bare_filename(filename);
        match self.service.fetch_file(bare).await {
            Ok(document) => return Ok((document, bare.to_string())),
            Err(ServiceError::NotFound { .. }) if bare != filename => {
                info!(bare, filename, "not found by bare name, retrying full identifier");
            }
            Err(ServiceError::NotFound { .. }) => {
                return Err(PresenterError::NotFound {
                    filename: filename.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        match self.service.fetch_file(filename).await {
            Ok(document) => Ok((document, filename.to_string())),
            Err(ServiceError::NotFound { .. }) => Err(PresenterError::NotFound {
                filename: filename.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Returns the last `/`- or `\`-separated segment of `name`.
///
/// A name ending in a separator is returned unchanged.
pub fn bare_filename(name: &str) -> &str {
    match name.rsplit(['/', '\\']).next() {
        Some(last) if !last.is_empty() => last,
        _ => name,
    }
}

/// Applies the timeout and cancellation of `options` to `fut`.
async fn guard<T>(
    options: &CallOptions,
    fut: impl Future<Output = Result<T, PresenterError>>,
) -> Result<T, PresenterError> {
    let limited = async {
        match options.timeout {
            Some(limit) => time::timeout(limit, fut)
                .await
                .map_err(|_| PresenterError::Timeout(limit))?,
            None => fut.await,
        }
    };

    tokio::select! {
        biased;
        () = options.cancel.cancelled() => Err(PresenterError::Cancelled),
        result = limited => result,
    }
}
