//! The remote search service: its interface and an HTTP implementation.

use std::future::Future;

use reqwest::{
    Response, StatusCode, Url,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    documents::DocumentUpload,
    error::ServiceError,
    model::{FullDocument, ScoredMatch, ServiceStatus},
};

/// Operations the presenter needs from a search backend.
pub trait SearchService {
    /// Probes liveness.
    fn status(&self) -> impl Future<Output = Result<ServiceStatus, ServiceError>> + Send;

    /// Submits a query against a set of documents; results come back ranked.
    fn search(
        &self,
        query: &str,
        documents: &[DocumentUpload],
    ) -> impl Future<Output = Result<Vec<ScoredMatch>, ServiceError>> + Send;

    /// Fetches the full text of one uploaded document.
    ///
    /// Returns [`ServiceError::NotFound`] when the service does not know `name`.
    fn fetch_file(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<FullDocument, ServiceError>> + Send;
}

/// [`SearchService`] over HTTP.
///
/// Endpoints: `GET /status`, multipart `POST /search`, `GET /file/{name}`.
#[derive(Debug, Clone)]
pub struct HttpService {
    /// Shared connection pool.
    client: reqwest::Client,
    /// Base URL; endpoint segments are appended to its path.
    base: Url,
}

impl HttpService {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("insight/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, base_url)
    }

    /// Creates a service over an existing client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        let base = Url::parse(base_url).map_err(|e| ServiceError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ServiceError::InvalidUrl {
                url: base_url.to_string(),
                message: "expected an http or https URL".to_string(),
            });
        }
        Ok(Self { client, base })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds an endpoint URL, percent-encoding each segment.
    ///
    /// A `/` inside a segment is encoded as `%2F`, so a path-like filename stays a single
    /// segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl SearchService for HttpService {
    async fn status(&self) -> Result<ServiceStatus, ServiceError> {
        let url = self.endpoint(&["status"]);
        debug!(%url, "probing service status");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn search(
        &self,
        query: &str,
        documents: &[DocumentUpload],
    ) -> Result<Vec<ScoredMatch>, ServiceError> {
        let url = self.endpoint(&["search"]);
        let mut form = Form::new().text("query", query.to_string());
        for doc in documents {
            form = form.part(
                "files",
                Part::bytes(doc.bytes.clone()).file_name(doc.name.clone()),
            );
        }
        debug!(%url, documents = documents.len(), "submitting search");
        let response = self.client.post(url).multipart(form).send().await?;
        decode(response).await
    }

    async fn fetch_file(&self, name: &str) -> Result<FullDocument, ServiceError> {
        let url = self.endpoint(&["file", name]);
        debug!(%url, "fetching document");
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound {
                name: name.to_string(),
            });
        }
        decode(response).await
    }
}

/// Decodes a JSON success body, or turns any other status into [`ServiceError::Status`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
