use async_trait::async_trait;
use reqwest::Url;
use search_page_model::prelude::SearchRequest;
use serde_json::Value;
use tracing::instrument;

use crate::Error;

/// Access to the search service.
///
/// The loader only ever sees this trait, so the transport can be swapped or intercepted.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a search, returning the (unvalidated) JSON response of the service.
    async fn search(&self, request: &SearchRequest) -> Result<Value, Error>;
}

/// Talks to the search service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpSearchBackend {
    client: reqwest::Client,
    url: Url,
}

impl HttpSearchBackend {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    #[instrument(skip(self), err)]
    async fn search(&self, request: &SearchRequest) -> Result<Value, Error> {
        log::debug!("POST {} {request:?}", self.url);

        let response = self.client.post(self.url.clone()).json(request).send().await?;

        // the status is not interpreted, whatever JSON comes back is handed to the page
        let status = response.status();
        if !status.is_success() {
            log::warn!("Search service responded with {status}");
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
