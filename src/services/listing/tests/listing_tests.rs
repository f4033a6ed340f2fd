use super::*;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::fetcher::FetchError;

const SNAPS_MARKUP: &str = r#"<pre><a href="../">../</a>
<a href="Pokemon%20Red.png">Pokemon Red.png</a>
<a href="Pokemon%20Blue.png">Pokemon Blue.png</a>
<a href="Tetris.png">Tetris.png</a>
</pre>"#;

/// Plays back a fixed sequence of fetch outcomes, recording every call.
/// An unexpected extra fetch panics, so over-fetching fails loudly.
struct ScriptedFetcher {
    delay: Duration,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    script: Mutex<VecDeque<Result<String, FetchError>>>,
}

impl ScriptedFetcher {
    fn new(script: Vec<Result<String, FetchError>>) -> Arc<Self> {
        Self::with_delay(script, Duration::ZERO)
    }

    /// Keeps each fetch in flight long enough for other callers to join it.
    fn with_delay(script: Vec<Result<String, FetchError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ListingFetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected extra fetch");
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            next
        }
        .boxed()
    }
}

fn cache_with(ttl: Duration, fetcher: Arc<ScriptedFetcher>) -> ListingCache {
    ListingCache::new("https://thumbs.test".to_string(), ttl, fetcher)
}

#[tokio::test]
async fn test_cold_fetch_then_warm_hit() {
    let fetcher = ScriptedFetcher::new(vec![Ok(SNAPS_MARKUP.to_string())]);
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    let first = cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await
        .expect("cold fetch succeeds");

    assert_eq!(first.system_name, "Nintendo - Game Boy");
    assert_eq!(first.category, ThumbnailKind::Snap);
    assert_eq!(first.files.len(), 3);
    // Canonical keys are precomputed once per listing
    assert_eq!(first.files[0].name, "Pokemon Red.png");
    assert_eq!(first.files[0].canonical, "pokemon red");

    let second = cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await
        .expect("warm hit succeeds");

    assert_eq!(fetcher.calls(), 1, "warm key must not refetch");
    assert!(
        Arc::ptr_eq(&first, &second),
        "warm hit serves the published listing"
    );
}

#[tokio::test]
async fn test_fetch_url_shape() {
    let fetcher = ScriptedFetcher::new(vec![Ok(SNAPS_MARKUP.to_string())]);
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await
        .unwrap();

    let urls = fetcher.urls.lock().unwrap();
    assert_eq!(urls.len(), 1);
    assert_eq!(
        urls[0],
        "https://thumbs.test/Nintendo%20-%20Game%20Boy/Named_Snaps/"
    );
}

// Two concurrent cold calls for one key collapse into a single upstream
// fetch, and both callers receive the same published listing.
#[tokio::test]
async fn test_concurrent_cold_calls_collapse() {
    let fetcher = ScriptedFetcher::with_delay(
        vec![Ok(SNAPS_MARKUP.to_string())],
        Duration::from_millis(20),
    );
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    let (a, b) = tokio::join!(
        cache.list_for("Nintendo - Game Boy", ThumbnailKind::Snap),
        cache.list_for("Nintendo - Game Boy", ThumbnailKind::Snap),
    );

    let a = a.expect("first waiter succeeds");
    let b = b.expect("second waiter succeeds");
    assert_eq!(fetcher.calls(), 1, "single flight for one key");
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn test_expired_key_refetches() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(SNAPS_MARKUP.to_string()),
        Ok(SNAPS_MARKUP.to_string()),
    ]);
    let cache = cache_with(Duration::from_millis(10), Arc::clone(&fetcher));

    cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 2, "expiry always triggers a re-fetch");
}

// A failed fetch is never cached; the next call retries.
#[tokio::test]
async fn test_failed_fetch_retries_on_next_call() {
    let fetcher = ScriptedFetcher::new(vec![
        Err(FetchError::Timeout),
        Ok(SNAPS_MARKUP.to_string()),
    ]);
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    let first = cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await;
    assert_eq!(
        first.unwrap_err(),
        ResolveError::ListingUnavailable {
            reason: "request timed out".to_string(),
        }
    );

    let second = cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await;
    assert!(second.is_ok(), "retry after failure succeeds");
    assert_eq!(fetcher.calls(), 2);
}

// Waiters sharing a failing flight all observe the same failure.
#[tokio::test]
async fn test_concurrent_waiters_share_failure() {
    let fetcher = ScriptedFetcher::with_delay(
        vec![Err(FetchError::Status(502))],
        Duration::from_millis(20),
    );
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    let (a, b) = tokio::join!(
        cache.list_for("Nintendo - Game Boy", ThumbnailKind::Snap),
        cache.list_for("Nintendo - Game Boy", ThumbnailKind::Snap),
    );

    assert_eq!(fetcher.calls(), 1);
    let expected = ResolveError::ListingUnavailable {
        reason: "unexpected status: HTTP 502".to_string(),
    };
    assert_eq!(a.unwrap_err(), expected);
    assert_eq!(b.unwrap_err(), expected);
}

// Markup with no anchors is not a listing; it is a retryable failure, never
// a cached empty result.
#[tokio::test]
async fn test_linkless_markup_is_unavailable_and_not_cached() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok("<html><h1>502 Bad Gateway</h1></html>".to_string()),
        Ok(SNAPS_MARKUP.to_string()),
    ]);
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    let first = cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await;
    assert!(matches!(
        first,
        Err(ResolveError::ListingUnavailable { .. })
    ));

    let second = cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await;
    assert!(second.is_ok());
    assert_eq!(fetcher.calls(), 2);
}

// A listing with links but no image files is valid and caches like any
// other; it is distinct from non-listing markup.
#[tokio::test]
async fn test_empty_listing_with_links_is_cached() {
    let markup = r#"<pre><a href="../">../</a>
<a href="index.txt">index.txt</a>
</pre>"#;
    let fetcher = ScriptedFetcher::new(vec![Ok(markup.to_string())]);
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    let first = cache
        .list_for("Watara - Supervision", ThumbnailKind::Title)
        .await
        .expect("empty listing is valid");
    assert!(first.files.is_empty());

    cache
        .list_for("Watara - Supervision", ThumbnailKind::Title)
        .await
        .expect("empty listing is served from cache");
    assert_eq!(fetcher.calls(), 1);
}

// Keys are (system, category); different categories of one system are
// independent entries.
#[tokio::test]
async fn test_unrelated_keys_fetch_independently() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(SNAPS_MARKUP.to_string()),
        Ok(SNAPS_MARKUP.to_string()),
    ]);
    let cache = cache_with(Duration::from_secs(3600), Arc::clone(&fetcher));

    cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Snap)
        .await
        .unwrap();
    cache
        .list_for("Nintendo - Game Boy", ThumbnailKind::Boxart)
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 2);
    let urls = fetcher.urls.lock().unwrap();
    assert!(urls[0].ends_with("/Named_Snaps/"));
    assert!(urls[1].ends_with("/Named_Boxarts/"));
}
