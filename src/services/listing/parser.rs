//! Directory-listing markup parsing.

use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for anchor href attributes.
static RE_ANCHOR_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\b[^>]*\bhref\s*=\s*"([^"]*)""#).expect("Invalid regex"));

/// Extensions the repository serves as thumbnails.
const IMAGE_EXTENSIONS: &[&str] = &["png"];

/// Raw parse product. The anchor count is kept so callers can tell an empty
/// listing apart from markup that is not a listing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedListing {
    pub link_count: usize,
    pub filenames: Vec<String>,
}

/// Extract image filenames from directory-listing markup, in document order.
///
/// Accepts standard autoindex pages: every `<a href="...">` is a link.
/// Parent, sort, absolute, and nested targets are skipped; surviving targets
/// are percent-decoded into display filenames and filtered to image
/// extensions.
pub fn parse_listing(html: &str) -> ParsedListing {
    let mut link_count = 0;
    let mut filenames = Vec::new();

    for captures in RE_ANCHOR_HREF.captures_iter(html) {
        link_count += 1;
        let href = &captures[1];

        if !is_file_target(href) {
            continue;
        }

        let decoded = match urlencoding::decode(href) {
            Ok(name) => name.into_owned(),
            Err(_) => href.to_string(),
        };

        // A decoded slash means the target was never a plain filename.
        if decoded.contains('/') {
            continue;
        }

        if has_image_extension(&decoded) {
            filenames.push(decoded);
        }
    }

    ParsedListing {
        link_count,
        filenames,
    }
}

/// Keep only targets that can name a file in the listing's own directory.
fn is_file_target(href: &str) -> bool {
    if href.is_empty() || href.starts_with('?') || href.starts_with('#') {
        return false; // sort links (?C=N;O=D) and fragments
    }
    if href.starts_with('/') || href.contains("://") {
        return false; // absolute paths and full URLs
    }
    if href == "." || href == ".." || href.starts_with("./") || href.starts_with("../") {
        return false; // self and parent links
    }
    true
}

fn has_image_extension(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
