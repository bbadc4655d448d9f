//! Final shape gate for evaluation verdicts.

use serde_json::Value;

use crate::evaluation::models::EvaluationResult;
use crate::normalize::{field_text, has_any_key};

pub const DEFAULT_MATCH: &str = "Unknown";
pub const DEFAULT_REASON: &str = "No reason was provided by the AI.";
pub const DEFAULT_RATING: &str = "N/A";

/// Keys that make a JSON object an evaluation answer.
pub const EVALUATION_KEYS: [&str; 3] = ["match", "reason", "rating"];

/// Turns any candidate into a fully populated `EvaluationResult`.
///
/// A candidate that is absent, not an object, or an object with none of the
/// expected keys is replaced wholesale; otherwise each missing field gets its
/// default and present fields are kept verbatim.
pub fn enforce_evaluation(candidate: Option<&Value>) -> EvaluationResult {
    let Some(object) = candidate
        .filter(|value| has_any_key(value, &EVALUATION_KEYS))
        .and_then(Value::as_object)
    else {
        return placeholder_evaluation();
    };

    EvaluationResult {
        match_result: field_text(object, "match").unwrap_or_else(|| DEFAULT_MATCH.to_string()),
        reason: field_text(object, "reason").unwrap_or_else(|| DEFAULT_REASON.to_string()),
        rating: field_text(object, "rating").unwrap_or_else(|| DEFAULT_RATING.to_string()),
    }
}

pub fn placeholder_evaluation() -> EvaluationResult {
    EvaluationResult {
        match_result: DEFAULT_MATCH.to_string(),
        reason: "The AI response did not contain an evaluation.".to_string(),
        rating: DEFAULT_RATING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_complete_object_is_kept_verbatim() {
        let value = json!({"match": "yes", "reason": "One example given.", "rating": "7/10 - tidy"});
        let result = enforce_evaluation(Some(&value));
        assert_eq!(result.match_result, "yes");
        assert_eq!(result.reason, "One example given.");
        assert_eq!(result.rating, "7/10 - tidy");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let value = json!({"match": "No"});
        let result = enforce_evaluation(Some(&value));
        assert_eq!(result.match_result, "No");
        assert_eq!(result.reason, DEFAULT_REASON);
        assert_eq!(result.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_numeric_rating_becomes_string() {
        let value = json!({"match": "Yes", "reason": "ok", "rating": 9});
        assert_eq!(enforce_evaluation(Some(&value)).rating, "9");
    }

    #[test]
    fn test_null_and_blank_fields_count_as_missing() {
        let value = json!({"match": null, "reason": "  ", "rating": "6/10"});
        let result = enforce_evaluation(Some(&value));
        assert_eq!(result.match_result, DEFAULT_MATCH);
        assert_eq!(result.reason, DEFAULT_REASON);
        assert_eq!(result.rating, "6/10");
    }

    #[test]
    fn test_absent_candidate_is_replaced() {
        assert_eq!(enforce_evaluation(None), placeholder_evaluation());
    }

    #[test]
    fn test_wrong_shape_is_replaced_wholesale() {
        assert_eq!(
            enforce_evaluation(Some(&json!(["Yes", "fine", "8/10"]))),
            placeholder_evaluation()
        );
        assert_eq!(
            enforce_evaluation(Some(&json!({"verdict": "Yes"}))),
            placeholder_evaluation()
        );
        assert_eq!(
            enforce_evaluation(Some(&json!("Yes"))),
            placeholder_evaluation()
        );
    }
}
