//! Similarity ratios over canonical strings.
//!
//! Scores live on a 0..=100 scale and are rounded to whole numbers, so
//! threshold comparisons never hinge on float dust.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Normalized Levenshtein over the raw strings, as a rounded percentage.
fn ratio(a: &str, b: &str) -> f64 {
    (normalized_levenshtein(a, b) * 100.0).round()
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Ratio over the strings with their whitespace tokens sorted.
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn join_nonempty(head: &str, tail: &str) -> String {
    if head.is_empty() {
        tail.to_string()
    } else if tail.is_empty() {
        head.to_string()
    } else {
        format!("{head} {tail}")
    }
}

/// Classic token-set construction: compare the shared-token core against
/// each side's core + remainder and take the best pairwise ratio. Word
/// order and repeated words within a title never penalize the score.
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    // An empty side would otherwise score 100 against the empty core.
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let common = tokens_a
        .intersection(&tokens_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let a_only = tokens_a
        .difference(&tokens_b)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let b_only = tokens_b
        .difference(&tokens_a)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let combined_a = join_nonempty(&common, &a_only);
    let combined_b = join_nonempty(&common, &b_only);

    ratio(&common, &combined_a)
        .max(ratio(&common, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// Best ratio of the shorter string against every equal-length character
/// window of the longer one. Rescues titles whose difference is a short
/// prefix or suffix the full-string ratio overcharges for, e.g. a sequel
/// numbered "II" on one side and "2" on the other.
fn partial_ratio(a: &str, b: &str) -> f64 {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if chars_a.len() <= chars_b.len() {
        (chars_a, chars_b)
    } else {
        (chars_b, chars_a)
    };

    if shorter.is_empty() {
        return 0.0;
    }

    let needle: String = shorter.iter().collect();
    if shorter.len() == longer.len() {
        return ratio(&needle, &longer.iter().collect::<String>());
    }

    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let haystack: String = window.iter().collect();
        let score = ratio(&needle, &haystack);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Partial ratio over the strings with their whitespace tokens sorted.
fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Best similarity between two canonical strings, in 0..=100, the maximum
/// of five ratios: plain, token-sort, token-set, partial, and partial
/// token-sort. An empty string never resembles anything, including another
/// empty one.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    ratio(a, b)
        .max(token_sort_ratio(a, b))
        .max(token_set_ratio(a, b))
        .max(partial_ratio(a, b))
        .max(partial_token_sort_ratio(a, b))
}

#[cfg(test)]
#[path = "tests/scorer_tests.rs"]
mod tests;
