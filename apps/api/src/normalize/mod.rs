//! Response normalization shared by every pipeline that reads model output.
//!
//! Model answers are untrusted text. Each pipeline runs the same three stages:
//! 1. strict parse after stripping fences and surrounding prose,
//! 2. pattern extraction over the raw text (pipeline-specific matchers),
//! 3. a placeholder built from a bounded slice of the raw text.
//!
//! The stage that produced a value is kept in `Normalized` so callers can tell a
//! degraded answer apart from a clean one. Raw text is never retained.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Upper bound on how much raw model text is echoed back inside a placeholder.
pub const MAX_RAW_ECHO_CHARS: usize = 500;

/// Every list-shaped result is clamped to this many items.
pub const MAX_ITEMS: usize = 5;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid code fence regex"));

static JSON_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[{}\[\]"]"#).expect("valid punctuation regex"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
        }
    }
}

/// Outcome of normalizing one model answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    /// The cleaned text parsed as JSON.
    ParsedStrict(T),
    /// Parsing failed; fields were recovered by pattern matching.
    ExtractedPartial { value: T, confidence: Confidence },
    /// Nothing recognisable; a placeholder carries a slice of the raw text.
    Fallback(T),
}

impl<T> Normalized<T> {
    pub fn stage(&self) -> &'static str {
        match self {
            Normalized::ParsedStrict(_) => "strict",
            Normalized::ExtractedPartial { .. } => "extracted",
            Normalized::Fallback(_) => "fallback",
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Normalized::ParsedStrict(_))
    }

    /// Set only for pattern-extracted values.
    pub fn confidence(&self) -> Option<Confidence> {
        match self {
            Normalized::ExtractedPartial { confidence, .. } => Some(*confidence),
            _ => None,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Normalized::ParsedStrict(v)
            | Normalized::ExtractedPartial { value: v, .. }
            | Normalized::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Normalized::ParsedStrict(v)
            | Normalized::ExtractedPartial { value: v, .. }
            | Normalized::Fallback(v) => v,
        }
    }
}

/// A pure pattern matcher over raw model text.
pub type Matcher<T> = fn(&str) -> Option<T>;

/// Runs matchers in order and returns the first hit.
pub fn first_match<T>(text: &str, matchers: &[Matcher<T>]) -> Option<T> {
    matchers.iter().find_map(|matcher| matcher(text))
}

fn delimited_span(text: &str, open: char, close: char) -> Option<(usize, &str)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| (start, &text[start..=end]))
}

/// Stage 1: strips fence markers, drops anything before the first opening
/// brace or bracket and after the matching last closer, then parses strictly.
///
/// The object span and the array span are both tried, earliest opener first,
/// so `[see below] {...}` still parses the object.
pub fn parse_strict(raw: &str) -> Option<Value> {
    let unfenced = CODE_FENCE.replace_all(raw, "");
    let mut spans: Vec<(usize, &str)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| delimited_span(&unfenced, open, close))
        .collect();
    spans.sort_by_key(|(start, _)| *start);
    spans
        .into_iter()
        .find_map(|(_, span)| serde_json::from_str(span).ok())
}

/// Raw text with fences and JSON punctuation removed and whitespace collapsed.
pub fn strip_json_noise(raw: &str) -> String {
    let unfenced = CODE_FENCE.replace_all(raw, " ");
    let unpunctuated = JSON_PUNCTUATION.replace_all(&unfenced, "");
    WHITESPACE_RUN
        .replace_all(&unpunctuated, " ")
        .trim()
        .to_string()
}

/// Truncates on a char boundary, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Reads a field as display text. Blank strings and nulls count as missing.
///
/// Numbers and booleans are rendered as-is; arrays of scalars are joined so a
/// model that answers `"benefits": ["a", "b"]` still yields a string.
pub fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    value_text(object.get(key)?)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|item| !item.is_array() && !item.is_object())
                .filter_map(value_text)
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

/// True when `value` is an object carrying at least one of `keys`.
pub fn has_any_key(value: &Value, keys: &[&str]) -> bool {
    value
        .as_object()
        .is_some_and(|object| keys.iter().any(|key| object.contains_key(*key)))
}
