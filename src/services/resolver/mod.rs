//! Batch resolution: registry validation → listing lookup → per-line matching.

use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::services::config::ResolverConfig;
use crate::services::listing::fetcher::{HttpListingFetcher, ListingFetcher};
use crate::services::listing::{CandidateListing, ListingCache};
use crate::services::matching::{self, normalizer};
use crate::services::registry::{ConsoleRegistry, ThumbnailKind};
use crate::types::errors::ResolveResult;

/// Archive names that are BIOS or system payloads, never games.
const BIOS_ARCHIVES: &[&str] = &["neogeo.zip"];

/// Outcome for one input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub input_name: String,
    pub matched_filename: Option<String>,
    pub score: f64,
    pub matched_url: Option<String>,
}

impl MatchResult {
    /// A line that matched nothing; carries the best rejected score.
    fn unmatched(input_name: String, score: f64) -> Self {
        Self {
            input_name,
            matched_filename: None,
            score,
            matched_url: None,
        }
    }
}

/// Assembled per-request product, ordered exactly like the input lines.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub console: String,
    pub system_name: String,
    pub category: ThumbnailKind,
    pub results: Vec<MatchResult>,
}

/// Per-request summary for the service log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub total_games: usize,
    pub total_matches: usize,
}

impl MatchReport {
    /// Matchable line count and accepted match count.
    pub fn stats(&self) -> MatchStats {
        MatchStats {
            total_games: self
                .results
                .iter()
                .filter(|result| is_matchable(&result.input_name))
                .count(),
            total_matches: self
                .results
                .iter()
                .filter(|result| result.matched_url.is_some())
                .count(),
        }
    }
}

pub struct ResolverService {
    config: ResolverConfig,
    registry: ConsoleRegistry,
    cache: ListingCache,
}

impl ResolverService {
    /// Production construction with the HTTP-backed fetcher.
    pub fn new(config: ResolverConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let fetcher = Arc::new(HttpListingFetcher::new(config.fetch_timeout)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Construction with an injected fetcher (tests, alternative transports).
    pub fn with_fetcher(config: ResolverConfig, fetcher: Arc<dyn ListingFetcher>) -> Self {
        let cache = ListingCache::new(config.base_url.clone(), config.listing_ttl, fetcher);
        Self {
            config,
            registry: ConsoleRegistry::new(),
            cache,
        }
    }

    /// Resolve a newline-delimited batch of ROM filenames.
    ///
    /// Validation always precedes the listing fetch, so an invalid console
    /// or category never costs a network round-trip; a batch with nothing
    /// matchable skips the fetch too. Results preserve input line order and
    /// count exactly, blank and duplicate lines included.
    pub async fn resolve_batch(
        &self,
        console_code: &str,
        category: &str,
        body: &str,
    ) -> ResolveResult<MatchReport> {
        let (spec, kind) = self.registry.resolve(console_code, category)?;

        let lines: Vec<&str> = body.lines().map(str::trim).collect();

        let results = if lines.iter().any(|line| is_matchable(line)) {
            let listing = self.cache.list_for(spec.system_name, kind).await?;
            lines
                .iter()
                .map(|line| self.resolve_line(line, spec.system_name, kind, &listing))
                .collect()
        } else {
            lines
                .iter()
                .map(|line| MatchResult::unmatched(line.to_string(), 0.0))
                .collect()
        };

        let report = MatchReport {
            console: spec.code.to_string(),
            system_name: spec.system_name.to_string(),
            category: kind,
            results,
        };

        let stats = report.stats();
        info!(
            "[Resolver] {} / {}: matched {}/{} games",
            report.console, report.category, stats.total_matches, stats.total_games
        );

        Ok(report)
    }

    fn resolve_line(
        &self,
        line: &str,
        system_name: &str,
        kind: ThumbnailKind,
        listing: &CandidateListing,
    ) -> MatchResult {
        if !is_matchable(line) {
            return MatchResult::unmatched(line.to_string(), 0.0);
        }

        let title = normalizer::normalize(line);
        let selection = matching::select(
            &title.canonical,
            listing.files.iter().map(|file| file.canonical.as_str()),
            self.config.min_score,
        );

        match selection.best {
            Some(index) if selection.accepted => {
                let file = &listing.files[index];
                MatchResult {
                    input_name: title.original,
                    matched_filename: Some(file.name.clone()),
                    score: selection.score,
                    matched_url: Some(thumbnail_url(
                        &self.config.base_url,
                        system_name,
                        kind,
                        &file.name,
                    )),
                }
            }
            Some(index) => {
                debug!(
                    "[Resolver] Score {} for {:?} (best: {:?}) is below {}, no match",
                    selection.score, title.original, listing.files[index].name, self.config.min_score
                );
                MatchResult::unmatched(title.original, selection.score)
            }
            None => MatchResult::unmatched(title.original, 0.0),
        }
    }
}

/// A line that can name a game: non-blank, not a hidden file, not a BIOS
/// archive.
fn is_matchable(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('.') && !BIOS_ARCHIVES.contains(&line)
}

/// Public URL of one thumbnail file, every path segment percent-encoded.
pub fn thumbnail_url(
    base_url: &str,
    system_name: &str,
    kind: ThumbnailKind,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}/{}",
        base_url,
        urlencoding::encode(system_name),
        kind.folder(),
        urlencoding::encode(filename)
    )
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
