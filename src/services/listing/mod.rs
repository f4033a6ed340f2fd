//! Directory index cache: fetch, parse, and serve candidate listings.
//!
//! One entry per (system, category) key with a TTL. Cold and expired keys
//! fetch through a shared in-flight future, so concurrent callers for one
//! key collapse into a single upstream request and all observe the same
//! listing or the same failure. Failures are never cached.

pub mod fetcher;
pub mod parser;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use log::{debug, info, warn};

use self::fetcher::ListingFetcher;
use crate::services::matching::normalizer;
use crate::services::registry::ThumbnailKind;
use crate::types::errors::ResolveError;

/// One candidate thumbnail file with its precomputed canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub canonical: String,
}

/// Immutable snapshot of one (system, category) directory listing.
/// Superseded, never mutated, on refresh.
#[derive(Debug, Clone)]
pub struct CandidateListing {
    pub system_name: String,
    pub category: ThumbnailKind,
    pub files: Vec<CandidateFile>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ListingKey {
    system_name: String,
    category: ThumbnailKind,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<CandidateListing>, ResolveError>>>;

enum CacheEntry {
    Ready {
        listing: Arc<CandidateListing>,
        expires_at: Instant,
    },
    Pending(SharedFetch),
}

#[derive(Clone)]
pub struct ListingCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    base_url: String,
    ttl: Duration,
    fetcher: Arc<dyn ListingFetcher>,
    entries: Mutex<HashMap<ListingKey, CacheEntry>>,
}

impl CacheInner {
    fn directory_url(&self, key: &ListingKey) -> String {
        format!(
            "{}/{}/{}/",
            self.base_url,
            urlencoding::encode(&key.system_name),
            key.category.folder()
        )
    }
}

impl ListingCache {
    pub fn new(base_url: String, ttl: Duration, fetcher: Arc<dyn ListingFetcher>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                base_url,
                ttl,
                fetcher,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Return the candidate listing for a (system, category) pair.
    ///
    /// Warm unexpired keys are served without network access. Cold and
    /// expired keys trigger one fetch shared by every concurrent caller.
    /// The entry map lock is held for bookkeeping only, never across I/O,
    /// so unrelated keys never contend on a fetch.
    pub async fn list_for(
        &self,
        system_name: &str,
        category: ThumbnailKind,
    ) -> Result<Arc<CandidateListing>, ResolveError> {
        let key = ListingKey {
            system_name: system_name.to_string(),
            category,
        };

        let fetch = {
            let mut entries = self
                .inner
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            // Drop an expired entry up front so the match below only sees
            // live state. Expiry always re-fetches; stale data is never served.
            if let Some(CacheEntry::Ready { expires_at, .. }) = entries.get(&key) {
                if *expires_at <= Instant::now() {
                    debug!(
                        "[Listing] Entry expired for {} / {}",
                        key.system_name, key.category
                    );
                    entries.remove(&key);
                }
            }

            match entries.get(&key) {
                Some(CacheEntry::Ready { listing, .. }) => {
                    debug!(
                        "[Listing] Cache hit for {} / {}",
                        key.system_name, key.category
                    );
                    return Ok(Arc::clone(listing));
                }
                Some(CacheEntry::Pending(shared)) => shared.clone(),
                None => {
                    // Publish the flight before unlocking so concurrent
                    // callers join it instead of fetching again.
                    let shared = fetch_and_publish(Arc::clone(&self.inner), key.clone())
                        .boxed()
                        .shared();
                    entries.insert(key, CacheEntry::Pending(shared.clone()));
                    shared
                }
            }
        };

        fetch.await
    }
}

/// Fetch, parse, and publish one listing, replacing the Pending entry with
/// Ready on success and removing it on failure so the next call retries.
async fn fetch_and_publish(
    inner: Arc<CacheInner>,
    key: ListingKey,
) -> Result<Arc<CandidateListing>, ResolveError> {
    let url = inner.directory_url(&key);
    info!(
        "[Listing] Fetching {} / {} from {url}",
        key.system_name, key.category
    );

    let outcome = inner.fetcher.fetch(&url).await;

    let mut entries = inner
        .entries
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let body = match outcome {
        Ok(body) => body,
        Err(e) => {
            warn!(
                "[Listing] Fetch failed for {} / {}: {e}",
                key.system_name, key.category
            );
            entries.remove(&key);
            return Err(ResolveError::ListingUnavailable {
                reason: e.to_string(),
            });
        }
    };

    let parsed = parser::parse_listing(&body);
    if parsed.link_count == 0 {
        warn!(
            "[Listing] Markup contained no links for {} / {}",
            key.system_name, key.category
        );
        entries.remove(&key);
        return Err(ResolveError::ListingUnavailable {
            reason: "listing markup contained no links".to_string(),
        });
    }

    let files: Vec<CandidateFile> = parsed
        .filenames
        .into_iter()
        .map(|name| {
            let canonical = normalizer::normalize(&name).canonical;
            CandidateFile { name, canonical }
        })
        .collect();

    info!(
        "[Listing] Cached {} candidates for {} / {}",
        files.len(),
        key.system_name,
        key.category
    );

    let listing = Arc::new(CandidateListing {
        system_name: key.system_name.clone(),
        category: key.category,
        files,
        fetched_at: Utc::now(),
    });

    let expires_at = Instant::now() + inner.ttl;
    entries.insert(
        key,
        CacheEntry::Ready {
            listing: Arc::clone(&listing),
            expires_at,
        },
    );

    Ok(listing)
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
