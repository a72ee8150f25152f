//! Extraction: best-effort recovery of a JSON array from raw backend text.
//!
//! Generation backends routinely wrap structured output in explanatory prose
//! or markdown fences despite being instructed not to. Extraction tries a
//! fixed sequence of strategies and gives up silently: the caller sees an
//! empty vector, never an error.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde_json::Value;

/// Fenced code block labeled `json`, case-insensitive on the tag.
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").unwrap());

/// Recovers an array of candidate records from raw backend text.
///
/// Strategies, in strict precedence order (first success wins):
/// 1. the entire text parses as a JSON array;
/// 2. a fenced block labeled `json` whose interior parses as a JSON array;
/// 3. the substring from the first `[` to the last `]` parses as a JSON
///    array.
///
/// The full-document parse runs before any substring matching because a
/// bracket scan can misfire on responses that legitimately contain brackets
/// in prose. Returns an empty vector when every strategy fails.
pub fn extract_candidates(raw: &str) -> Vec<Value> {
    if let Some(items) = parse_array(raw) {
        debug!("extracted {} candidates from full-text parse", items.len());
        return items;
    }

    if let Some(block) = fenced_json_block(raw) {
        if let Some(items) = parse_array(block) {
            debug!("extracted {} candidates from fenced block", items.len());
            return items;
        }
    }

    if let Some(span) = bracket_span(raw) {
        if let Some(items) = parse_array(span) {
            debug!("extracted {} candidates from bracket span", items.len());
            return items;
        }
    }

    debug!(
        "no JSON array recovered from {} bytes of backend text",
        raw.len()
    );
    Vec::new()
}

/// Parses `text` as JSON and returns the elements only when the top-level
/// value is an array.
fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Returns the interior of the first ```json fenced block, trimmed, with the
/// delimiters and language tag stripped.
fn fenced_json_block(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Returns the substring from the first `[` to the last `]`, inclusive, when
/// both exist and the `]` comes after the `[`.
fn bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
