//! Fuzzy candidate selection over canonical titles.

pub mod normalizer;
pub mod scorer;

/// Outcome of scanning one title against a candidate sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Best-scoring candidate index; `None` when nothing scored above zero.
    pub best: Option<usize>,
    /// Best score observed, accepted or not, so callers can log near-misses.
    pub score: f64,
    /// Whether `best` cleared the acceptance threshold.
    pub accepted: bool,
}

impl Selection {
    /// An empty scan: nothing matched, nothing scored.
    pub fn none() -> Self {
        Self {
            best: None,
            score: 0.0,
            accepted: false,
        }
    }
}

/// Pick the best candidate for `canonical` out of `candidates`.
///
/// Scans in listing order; only a strictly higher score replaces the running
/// best, so exact ties keep the earliest candidate. A perfect 100 stops the
/// scan (no later candidate can beat it, and the first 100 is the earliest).
/// A best score exactly at `min_score` is accepted. Empty titles and empty
/// candidate sequences yield no-match without scoring anything.
pub fn select<'a, I>(canonical: &str, candidates: I, min_score: f64) -> Selection
where
    I: IntoIterator<Item = &'a str>,
{
    if canonical.is_empty() {
        return Selection::none();
    }

    let mut best = None;
    let mut best_score = 0.0_f64;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = scorer::similarity(canonical, candidate);
        if score > best_score {
            best_score = score;
            best = Some(index);
            if score >= 100.0 {
                break;
            }
        }
    }

    Selection {
        best,
        score: best_score,
        accepted: best.is_some() && best_score >= min_score,
    }
}

#[cfg(test)]
#[path = "tests/matching_tests.rs"]
mod tests;
