use std::time::Duration;

use anyhow::Context;

/// Default thumbnail repository root.
const DEFAULT_BASE_URL: &str = "https://thumbnails.libretro.com";
/// Default acceptance threshold. Best scores below this become "no match".
const DEFAULT_MIN_SCORE: f64 = 90.0;
/// Default candidate listing lifetime (one day).
const DEFAULT_LISTING_TTL_SECS: u64 = 86_400;
/// Default upper bound for a single listing fetch.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// All resolver policy values in one place.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Thumbnail repository root, no trailing slash.
    pub base_url: String,
    /// Minimum similarity score (0..=100) required to report a match.
    pub min_score: f64,
    /// How long a fetched candidate listing stays valid.
    pub listing_ttl: Duration,
    /// Per-fetch timeout for the HTTP client.
    pub fetch_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_score: DEFAULT_MIN_SCORE,
            listing_ttl: Duration::from_secs(DEFAULT_LISTING_TTL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ResolverConfig {
    /// Load the defaults with environment overrides applied on top.
    ///
    /// Honors a `.env` file when present. Recognized variables:
    /// `ROMTHUMBS_BASE_URL`, `ROMTHUMBS_MIN_SCORE`,
    /// `ROMTHUMBS_LISTING_TTL_SECS`, `ROMTHUMBS_FETCH_TIMEOUT_SECS`.
    /// A malformed value is an error, never silently replaced.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let _ = dotenvy::dotenv(); // Try to load .env, ignore if missing

        let mut config = Self::default();

        if let Ok(url) = std::env::var("ROMTHUMBS_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("ROMTHUMBS_MIN_SCORE") {
            config.min_score = raw
                .parse::<f64>()
                .with_context(|| format!("ROMTHUMBS_MIN_SCORE is not a number: {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var("ROMTHUMBS_LISTING_TTL_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("ROMTHUMBS_LISTING_TTL_SECS is not a number: {raw:?}"))?;
            config.listing_ttl = Duration::from_secs(secs);
        }
        if let Ok(raw) = std::env::var("ROMTHUMBS_FETCH_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("ROMTHUMBS_FETCH_TIMEOUT_SECS is not a number: {raw:?}"))?;
            config.fetch_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the resolver cannot operate with.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.min_score > 0.0 && self.min_score <= 100.0) {
            anyhow::bail!("min_score must be in (0, 100], got {}", self.min_score);
        }
        if self.base_url.is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
