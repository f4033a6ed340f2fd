//! Filename canonicalization.
//!
//! ROM filenames and candidate thumbnail filenames are reduced to the same
//! canonical comparison space before any scoring happens.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for the trailing file extension.
static RE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\w+$").expect("Invalid regex"));

/// Compiled regex for parenthesized/bracketed release tags.
static RE_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(\([^)]*\)|\[[^\]]*\]|\{[^}]*\})").expect("Invalid regex"));

/// Compiled regex for stripping non-alphanumeric characters.
static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("Invalid regex"));

/// Folkloric spellings → the repository's spelling.
const COMMON_RENAMES: &[(&str, &str)] = &[("Megaman", "Mega Man")];

/// A filename together with its canonical comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    pub original: String,
    pub canonical: String,
}

/// Reduce a filename to its canonical comparison key.
///
/// Pipeline:
/// 1. Drop the trailing file extension
/// 2. Remove `(...)`, `[...]`, `{...}` release tags (region, language, rev)
/// 3. Apply common renames (e.g. "Megaman" → "Mega Man")
/// 4. Transliterate non-ASCII to Latin via deunicode ("Pokémon" → "Pokemon")
/// 5. Strip non-alphanumeric symbols (keep spaces)
/// 6. Lowercase, collapse whitespace, trim
///
/// Total and deterministic; canonical output is a fixed point. Empty input
/// canonicalizes to the empty string, which the matcher treats as
/// unmatchable rather than an error.
pub fn normalize(raw: &str) -> NormalizedTitle {
    let trimmed = raw.trim();

    let no_ext = RE_EXTENSION.replace(trimmed, "");
    let no_tags = RE_TAGS.replace_all(&no_ext, "");

    let mut renamed = no_tags.to_string();
    for (old_name, new_name) in COMMON_RENAMES {
        renamed = renamed.replace(old_name, new_name);
    }

    let latin = deunicode(&renamed);
    let clean = RE_NON_ALNUM.replace_all(&latin, " ");

    let canonical = clean
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    NormalizedTitle {
        original: trimmed.to_string(),
        canonical,
    }
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
