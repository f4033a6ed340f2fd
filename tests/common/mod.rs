use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use romthumbs::services::config::ResolverConfig;
use romthumbs::services::listing::fetcher::{FetchError, ListingFetcher};
use romthumbs::services::resolver::ResolverService;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Directory listing markup the way the thumbnail repository serves it.
pub const GB_SNAPS_MARKUP: &str = r#"<html>
<head><title>Index of /Nintendo - Game Boy/Named_Snaps/</title></head>
<body bgcolor="white">
<h1>Index of /Nintendo - Game Boy/Named_Snaps/</h1><hr><pre><a href="../">../</a>
<a href="Pokemon%20Red.png">Pokemon Red.png</a>
<a href="Pokemon%20Blue.png">Pokemon Blue.png</a>
<a href="Tetris.png">Tetris.png</a>
</pre><hr></body>
</html>"#;

enum Plan {
    /// Same outcome for every fetch.
    Always(Result<String, FetchError>),
    /// One outcome per fetch; an extra fetch panics.
    Script(Mutex<VecDeque<Result<String, FetchError>>>),
}

/// Deterministic stand-in for the HTTP fetcher, counting upstream calls.
pub struct FakeFetcher {
    plan: Plan,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn serving(markup: &str) -> Arc<Self> {
        Arc::new(Self {
            plan: Plan::Always(Ok(markup.to_string())),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    /// Like `serving`, but keeps each fetch in flight for `delay` so
    /// concurrent requests can pile onto it.
    pub fn serving_slowly(markup: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            plan: Plan::Always(Ok(markup.to_string())),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            plan: Plan::Always(Err(error)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn scripted(outcomes: Vec<Result<String, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            plan: Plan::Script(Mutex::new(outcomes.into())),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ListingFetcher for FakeFetcher {
    fn fetch(&self, _url: &str) -> BoxFuture<'_, Result<String, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = match &self.plan {
            Plan::Always(outcome) => outcome.clone(),
            Plan::Script(script) => script
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra fetch"),
        };
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
        .boxed()
    }
}

pub fn service_with(fetcher: Arc<FakeFetcher>) -> ResolverService {
    init_logging();
    ResolverService::with_fetcher(ResolverConfig::default(), fetcher)
}

pub fn service_with_ttl(listing_ttl: Duration, fetcher: Arc<FakeFetcher>) -> ResolverService {
    init_logging();
    let config = ResolverConfig {
        listing_ttl,
        ..ResolverConfig::default()
    };
    ResolverService::with_fetcher(config, fetcher)
}
