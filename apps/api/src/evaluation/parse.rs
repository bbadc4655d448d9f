//! Evaluation answer normalization.
//!
//! Strict JSON first; otherwise the verdict, rating and reason are each pulled
//! out of the free text by their own ordered matcher list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::evaluation::contract::{
    enforce_evaluation, DEFAULT_MATCH, DEFAULT_RATING, EVALUATION_KEYS,
};
use crate::evaluation::models::EvaluationResult;
use crate::normalize::{
    first_match, has_any_key, parse_strict, strip_json_noise, truncate_chars, Confidence, Matcher, Normalized,
    MAX_RAW_ECHO_CHARS,
};

static MATCH_LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bmatch(?:es)?\b["']?\s*[:=?\-]?\s*["']?\s*(yes|no|partial(?:ly)?)\b"#)
        .expect("valid match regex")
});

static VERDICT_LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bverdict\b["']?\s*[:=\-]?\s*["']?\s*(yes|no|partial(?:ly)?)\b"#)
        .expect("valid verdict regex")
});

static RATING_LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:rating|score)\b["']?\s*[:=\-]?\s*["']?\s*(\d{1,2}(?:\.\d+)?)"#)
        .expect("valid rating regex")
});

static RATING_OUT_OF_TEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}(?:\.\d+)?)\s*(?:/|out\s+of)\s*10\b").expect("valid out-of-ten regex")
});

static REASON_LABELLED: Lazy<Regex> = Lazy::new(|| labelled_line("reason"));
static EXPLANATION_LABELLED: Lazy<Regex> = Lazy::new(|| labelled_line("explanation"));
static ANALYSIS_LABELLED: Lazy<Regex> = Lazy::new(|| labelled_line("analysis"));

/// Where another field label starts on the same line, e.g. `. Rating: 8/10`
/// or `", "rating":`. A labelled value is cut there.
static NEXT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)["',\s]+["']?\b(?:match|verdict|rating|score|reason|explanation|analysis)\b["']?\s*[:=]"#,
    )
    .expect("valid next label regex")
});

fn labelled_line(label: &str) -> Regex {
    Regex::new(&format!(r#"(?i)\b{label}\b["']?\s*[:=\-]\s*["']?([^\n]+)"#))
        .expect("valid labelled line regex")
}

const VERDICT_MATCHERS: [Matcher<String>; 2] = [match_labelled, verdict_labelled];
const RATING_MATCHERS: [Matcher<String>; 2] = [rating_labelled, rating_out_of_ten];
const REASON_MATCHERS: [Matcher<String>; 3] =
    [reason_labelled, explanation_labelled, analysis_labelled];

fn capture(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    let value = value.trim_end_matches([',', '}', '"', '\'']).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn match_labelled(text: &str) -> Option<String> {
    capture(&MATCH_LABELLED, text)
}

fn verdict_labelled(text: &str) -> Option<String> {
    capture(&VERDICT_LABELLED, text)
}

fn rating_labelled(text: &str) -> Option<String> {
    capture(&RATING_LABELLED, text).map(|n| format!("{n}/10"))
}

fn rating_out_of_ten(text: &str) -> Option<String> {
    capture(&RATING_OUT_OF_TEN, text).map(|n| format!("{n}/10"))
}

/// Like `capture`, but the value stops where the next field label begins.
fn capture_until_next_label(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str();
    let value = match NEXT_LABEL.find(value) {
        Some(next) => &value[..next.start()],
        None => value,
    };
    let value = value.trim().trim_end_matches([',', '}', '"', '\'']).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn reason_labelled(text: &str) -> Option<String> {
    capture_until_next_label(&REASON_LABELLED, text)
}

fn explanation_labelled(text: &str) -> Option<String> {
    capture_until_next_label(&EXPLANATION_LABELLED, text)
}

fn analysis_labelled(text: &str) -> Option<String> {
    capture_until_next_label(&ANALYSIS_LABELLED, text)
}

/// Stage 2. Returns `None` when no labelled field could be found at all.
///
/// When a verdict or rating is found but no reason label is, the whole raw
/// text (JSON punctuation stripped) becomes the reason.
pub fn extract_evaluation(raw: &str) -> Option<Value> {
    let verdict = first_match(raw, &VERDICT_MATCHERS);
    let rating = first_match(raw, &RATING_MATCHERS);
    let reason = first_match(raw, &REASON_MATCHERS);

    if verdict.is_none() && rating.is_none() && reason.is_none() {
        return None;
    }

    let mut object = Map::new();
    if let Some(verdict) = verdict {
        object.insert("match".to_string(), Value::String(verdict));
    }
    if let Some(rating) = rating {
        object.insert("rating".to_string(), Value::String(rating));
    }
    let reason = reason.or_else(|| Some(strip_json_noise(raw)).filter(|s| !s.is_empty()));
    if let Some(reason) = reason {
        object.insert("reason".to_string(), Value::String(reason));
    }
    Some(Value::Object(object))
}

/// Stage 3 candidate: a placeholder echoing a bounded slice of the raw text.
fn fallback_candidate(raw: &str) -> Value {
    let cleaned = strip_json_noise(raw);
    let reason = if cleaned.is_empty() {
        "The AI response could not be parsed and was empty.".to_string()
    } else {
        format!(
            "The AI response could not be parsed. Raw response: {}",
            truncate_chars(&cleaned, MAX_RAW_ECHO_CHARS)
        )
    };
    json!({
        "match": DEFAULT_MATCH,
        "reason": reason,
        "rating": DEFAULT_RATING,
    })
}

/// Runs all three stages over one model answer. Deterministic.
pub fn normalize_evaluation(raw: &str) -> Normalized<EvaluationResult> {
    // A quoted fragment such as `{"input": "cat"}` parses but is not an answer.
    if let Some(value) = parse_strict(raw).filter(|value| has_any_key(value, &EVALUATION_KEYS)) {
        return Normalized::ParsedStrict(enforce_evaluation(Some(&value)));
    }

    match extract_evaluation(raw) {
        Some(value) => Normalized::ExtractedPartial {
            value: enforce_evaluation(Some(&value)),
            confidence: Confidence::Low,
        },
        None => Normalized::Fallback(enforce_evaluation(Some(&fallback_candidate(raw)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::contract::DEFAULT_REASON;

    #[test]
    fn test_fenced_json_uses_strict_branch() {
        let raw = "```json\n{\"match\": \"Yes\", \"reason\": \"Single example.\", \"rating\": \"8/10 - clear\"}\n```";
        let normalized = normalize_evaluation(raw);
        assert_eq!(normalized.stage(), "strict");
        let result = normalized.into_inner();
        assert_eq!(result.match_result, "Yes");
        assert_eq!(result.reason, "Single example.");
        assert_eq!(result.rating, "8/10 - clear");
    }

    #[test]
    fn test_strict_branch_wins_over_labels_in_surrounding_prose() {
        let raw = "Match: No, rating 2/10.\n{\"match\": \"Partially\", \"reason\": \"r\", \"rating\": \"5/10\"}";
        let result = normalize_evaluation(raw);
        assert!(!result.is_degraded());
        assert_eq!(result.value().match_result, "Partially");
        assert_eq!(result.value().rating, "5/10");
    }

    #[test]
    fn test_strict_parse_missing_field_gets_default() {
        let raw = r#"{"match": "No", "rating": "3/10"}"#;
        let result = normalize_evaluation(raw).into_inner();
        assert_eq!(result.reason, DEFAULT_REASON);
    }

    #[test]
    fn test_malformed_json_falls_back_to_labels() {
        let raw = "{\"match\": \"Yes\", \"reason\": \"Uses exactly one example\", \"rating\": \"7/10\",,}";
        let normalized = normalize_evaluation(raw);
        assert_eq!(normalized.stage(), "extracted");
        let result = normalized.into_inner();
        assert_eq!(result.match_result, "Yes");
        assert_eq!(result.reason, "Uses exactly one example");
        assert_eq!(result.rating, "7/10");
    }

    #[test]
    fn test_prose_answer_is_extracted_with_case_preserved() {
        let raw = "Match: partially\nScore: 6\nExplanation: The prompt hints at reasoning but never asks for steps.";
        let result = normalize_evaluation(raw).into_inner();
        assert_eq!(result.match_result, "partially");
        assert_eq!(result.rating, "6/10");
        assert_eq!(
            result.reason,
            "The prompt hints at reasoning but never asks for steps."
        );
    }

    #[test]
    fn test_rating_out_of_ten_without_label() {
        let raw = "Does it match? NO. I would give it 4 out of 10.";
        let result = normalize_evaluation(raw).into_inner();
        assert_eq!(result.match_result, "NO");
        assert_eq!(result.rating, "4/10");
    }

    #[test]
    fn test_missing_reason_uses_cleaned_raw_text() {
        let raw = "match - yes\nThe examples are consistent.";
        let result = normalize_evaluation(raw).into_inner();
        assert_eq!(result.match_result, "yes");
        assert_eq!(result.reason, "match - yes The examples are consistent.");
        assert_eq!(result.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_unrecognisable_text_hits_fallback() {
        let raw = "I am unable to help with that request.";
        let normalized = normalize_evaluation(raw);
        assert_eq!(normalized.stage(), "fallback");
        let result = normalized.into_inner();
        assert_eq!(result.match_result, DEFAULT_MATCH);
        assert_eq!(result.rating, DEFAULT_RATING);
        assert!(result.reason.contains("could not be parsed"));
        assert!(result.reason.contains("unable to help"));
    }

    #[test]
    fn test_empty_text_hits_fallback() {
        let result = normalize_evaluation("   ").into_inner();
        assert!(result.reason.contains("empty"));
    }

    #[test]
    fn test_fallback_echo_is_bounded() {
        let raw = "x".repeat(5_000);
        let result = normalize_evaluation(&raw).into_inner();
        assert!(result.reason.chars().count() < MAX_RAW_ECHO_CHARS + 100);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in [
            "{\"match\": \"Yes\"}",
            "Match: no\nReason: missing examples",
            "nothing useful",
        ] {
            assert_eq!(normalize_evaluation(raw), normalize_evaluation(raw));
        }
    }

    #[test]
    fn test_one_line_answer_keeps_fields_apart() {
        let raw = "Match: Yes. Reason: It has exactly one example. Rating: 8/10";
        let normalized = normalize_evaluation(raw);
        assert_eq!(normalized.stage(), "extracted");
        let result = normalized.into_inner();
        assert_eq!(result.match_result, "Yes");
        assert_eq!(result.reason, "It has exactly one example.");
        assert_eq!(result.rating, "8/10");
    }

    #[test]
    fn test_quoted_json_fragment_does_not_count_as_strict() {
        let raw = "Match: Yes\nReason: The single example {\"input\": \"cat\"} is shown before the task.\nRating: 8/10";
        let normalized = normalize_evaluation(raw);
        assert_eq!(normalized.stage(), "extracted");
        let result = normalized.into_inner();
        assert_eq!(result.match_result, "Yes");
        assert_eq!(
            result.reason,
            "The single example {\"input\": \"cat\"} is shown before the task."
        );
        assert_eq!(result.rating, "8/10");
    }

    #[test]
    fn test_analysis_label_is_last_reason_source() {
        let raw = "Verdict: No\nAnalysis: Two examples are given, so this is few-shot.";
        assert!(reason_labelled(raw).is_none());
        assert!(explanation_labelled(raw).is_none());
        assert_eq!(
            analysis_labelled(raw).as_deref(),
            Some("Two examples are given, so this is few-shot.")
        );

        let result = normalize_evaluation(raw).into_inner();
        assert_eq!(result.match_result, "No");
        assert_eq!(result.reason, "Two examples are given, so this is few-shot.");
    }

    #[test]
    fn test_reason_label_wins_over_analysis() {
        let raw = "Analysis: long notes\nReason: short answer";
        assert_eq!(
            first_match(raw, &REASON_MATCHERS).as_deref(),
            Some("short answer")
        );
    }

    #[test]
    fn test_word_matching_inside_other_words_is_ignored() {
        assert!(extract_evaluation("The rematch was not scored.").is_none());
    }
}
