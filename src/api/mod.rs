//! Framework-agnostic request surface and renderings.
//!
//! Any HTTP framework can wrap this: build a `MatchRequest` from the route,
//! pick the format from the request's content type, map `ResolveError::class`
//! to a status code, and serve the rendered body.

use serde_json::{json, Map, Value};

use crate::services::resolver::{MatchReport, ResolverService};
use crate::types::errors::ResolveResult;

/// One unit of work: a console, a category, and a newline-delimited batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub console: String,
    pub category: String,
    pub body: String,
}

/// Which rendering the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Text,
}

impl ResponseFormat {
    /// `text/plain` (with or without parameters) selects the line-oriented
    /// rendering; anything else gets the structured one.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(value) if value.trim().to_ascii_lowercase().starts_with("text/plain") => {
                Self::Text
            }
            _ => Self::Json,
        }
    }
}

/// A rendered response plus the content type it should be served with.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedResponse {
    Json(Value),
    Text(String),
}

impl RenderedResponse {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Text(_) => "text/plain; charset=utf-8",
        }
    }
}

/// Resolve a batch and render it in the requested format.
pub async fn handle(
    service: &ResolverService,
    request: &MatchRequest,
    format: ResponseFormat,
) -> ResolveResult<RenderedResponse> {
    let report = service
        .resolve_batch(&request.console, &request.category, &request.body)
        .await?;

    Ok(match format {
        ResponseFormat::Json => RenderedResponse::Json(render_json(&report)),
        ResponseFormat::Text => RenderedResponse::Text(render_text(&report)),
    })
}

/// `{"console": <code>, "matches": {<input>: <url-or-null>}}`.
///
/// The object carries each distinct input name once; duplicate input lines
/// collapse last-write-wins. Positional fidelity lives in the text form.
pub fn render_json(report: &MatchReport) -> Value {
    let mut matches = Map::new();
    for result in &report.results {
        let url = match &result.matched_url {
            Some(url) => Value::String(url.clone()),
            None => Value::Null,
        };
        matches.insert(result.input_name.clone(), url);
    }

    json!({
        "console": report.console,
        "matches": matches,
    })
}

/// One `<input>\t<url>` line per input, with an empty URL field when
/// unmatched. Order and duplicates preserved, no trailing newline.
pub fn render_text(report: &MatchReport) -> String {
    report
        .results
        .iter()
        .map(|result| {
            format!(
                "{}\t{}",
                result.input_name,
                result.matched_url.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
