use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    error::{FcktyError, Result},
    types::AnalysisResult,
};

/// Pulls the candidate JSON span out of a free-text model reply.
pub type ExtractionStrategy = fn(&str) -> Option<&str>;

static FENCED_WITH_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n([\s\S]*?)\n```").expect("valid regex"));

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json([\s\S]*?)```").expect("valid regex"));

static BARE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid regex"));

/// Tried in order; the first one that matches wins.
pub const STRATEGIES: [(&str, ExtractionStrategy); 3] = [
    ("fenced-with-newline", fenced_with_newline),
    ("fenced", fenced),
    ("bare-object", bare_object),
];

pub fn fenced_with_newline(text: &str) -> Option<&str> {
    FENCED_WITH_NEWLINE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn fenced(text: &str) -> Option<&str> {
    FENCED
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// From the first `{` to the last `}`.
pub fn bare_object(text: &str) -> Option<&str> {
    BARE_OBJECT.find(text).map(|m| m.as_str())
}

/// Returns the name of the matching strategy along with the span it captured.
pub fn extract_json_span(text: &str) -> Option<(&'static str, &str)> {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(text).map(|span| (*name, span)))
}

/// Reduce a model reply to an [`AnalysisResult`] with no sources attached.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult> {
    let (strategy, span) = extract_json_span(text).ok_or(FcktyError::NoParseableResult)?;
    debug!(strategy, len = span.len(), "extracted analysis JSON");

    serde_json::from_str(span).map_err(FcktyError::MalformedResult)
}
