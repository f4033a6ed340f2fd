//! Listing retrieval behind an injectable capability.

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log::debug;
use reqwest::Client;
use thiserror::Error;

/// What went wrong talking to the listing source. The cache logs the
/// specifics and converts this into a client-facing `ListingUnavailable`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status: HTTP {0}")]
    Status(u16),
}

/// Capability to retrieve directory-listing markup for a URL.
///
/// The cache depends on this instead of a concrete client so the matching
/// core is testable without network access; tests substitute deterministic
/// fakes returning fixed markup.
pub trait ListingFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>>;
}

/// Production fetcher over a shared reqwest client.
pub struct HttpListingFetcher {
    client: Client,
}

impl HttpListingFetcher {
    pub fn new(timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ListingFetcher for HttpListingFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        let url = url.to_string();
        async move {
            debug!("[Listing] GET {url}");
            let response = self.client.get(&url).send().await.map_err(classify)?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            response.text().await.map_err(classify)
        }
        .boxed()
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(error.to_string())
    }
}
