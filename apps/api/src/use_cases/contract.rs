//! Final shape gate for use-case results.
//!
//! Whatever stage produced the candidate, the caller gets 1..=5 items of the
//! deployment's format with every field populated.

use serde_json::{Map, Value};

use crate::normalize::{field_text, MAX_ITEMS};
use crate::use_cases::models::{
    LongUseCase, ShortUseCase, UseCaseFormat, UseCaseItem, UseCaseResult,
};

pub const DEFAULT_PROMPT_TEXT: &str = "No prompt text was provided by the AI.";
pub const DEFAULT_TITLE: &str = "Untitled Use Case";
pub const DEFAULT_DESCRIPTION: &str = "No description was provided by the AI.";
pub const DEFAULT_BENEFITS: &str = "Benefits were not specified.";
pub const DEFAULT_IMPLEMENTATION: &str = "Implementation details were not specified.";

/// Keys the list may live under. The snake_case key is the one we ask for.
pub const LIST_KEYS: [&str; 2] = ["use_cases", "useCases"];

const PROMPT_KEYS: [&str; 3] = ["prompt_text", "promptText", "prompt"];

/// Keys that make a bare object a single use-case item.
const ITEM_KEYS: [&str; 7] = [
    "prompt_text",
    "promptText",
    "prompt",
    "title",
    "description",
    "benefits",
    "implementation",
];

/// Finds the item list in a candidate.
///
/// Accepts an object holding a list under a known key, a top-level array of
/// objects, or a bare object that is itself one item. Returns `None` when the
/// candidate has none of these shapes, including a known key holding a
/// non-list.
pub fn item_list(candidate: &Value) -> Option<&[Value]> {
    match candidate {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            Some(items.as_slice())
        }
        Value::Object(object) => match LIST_KEYS.iter().find_map(|key| object.get(*key)) {
            Some(list) => list.as_array().map(Vec::as_slice),
            None if ITEM_KEYS.iter().any(|key| object.contains_key(*key)) => {
                Some(std::slice::from_ref(candidate))
            }
            None => None,
        },
        _ => None,
    }
}

/// Turns any candidate into a valid `UseCaseResult` for `format`.
///
/// Checks, in order: the candidate has an item list (see `item_list`); the
/// list is clamped to `MAX_ITEMS`; each item's fields are filled in
/// individually. An empty list is replaced by a single placeholder.
pub fn enforce_use_cases(candidate: Option<&Value>, format: UseCaseFormat) -> UseCaseResult {
    let Some(list) = candidate.and_then(item_list) else {
        return placeholder_result(format);
    };

    let items: Vec<UseCaseItem> = list
        .iter()
        .take(MAX_ITEMS)
        .map(|item| enforce_item(item, format))
        .collect();

    if items.is_empty() {
        return placeholder_result(format);
    }
    UseCaseResult { items }
}

fn enforce_item(item: &Value, format: UseCaseFormat) -> UseCaseItem {
    let empty = Map::new();
    // A bare string is taken as the item's primary text.
    let (object, primary) = match item {
        Value::Object(object) => (object, None),
        Value::String(text) if !text.trim().is_empty() => (&empty, Some(text.trim().to_string())),
        _ => (&empty, None),
    };

    match format {
        UseCaseFormat::Short => UseCaseItem::Short(ShortUseCase {
            prompt_text: primary
                .or_else(|| PROMPT_KEYS.iter().find_map(|key| field_text(object, key)))
                .unwrap_or_else(|| DEFAULT_PROMPT_TEXT.to_string()),
        }),
        UseCaseFormat::Long => UseCaseItem::Long(LongUseCase {
            title: primary
                .or_else(|| field_text(object, "title"))
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: field_text(object, "description")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            benefits: field_text(object, "benefits")
                .unwrap_or_else(|| DEFAULT_BENEFITS.to_string()),
            implementation: field_text(object, "implementation")
                .unwrap_or_else(|| DEFAULT_IMPLEMENTATION.to_string()),
        }),
    }
}

/// The single-item result used when a candidate cannot be read at all.
pub fn placeholder_result(format: UseCaseFormat) -> UseCaseResult {
    let notice = "The AI response did not contain any use cases. Try rephrasing the task.";
    let item = match format {
        UseCaseFormat::Short => UseCaseItem::Short(ShortUseCase {
            prompt_text: notice.to_string(),
        }),
        UseCaseFormat::Long => UseCaseItem::Long(LongUseCase {
            title: DEFAULT_TITLE.to_string(),
            description: notice.to_string(),
            benefits: DEFAULT_BENEFITS.to_string(),
            implementation: DEFAULT_IMPLEMENTATION.to_string(),
        }),
    };
    UseCaseResult { items: vec![item] }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn long(item: &UseCaseItem) -> &LongUseCase {
        match item {
            UseCaseItem::Long(long) => long,
            other => panic!("expected long item, got {other:?}"),
        }
    }

    fn short(item: &UseCaseItem) -> &ShortUseCase {
        match item {
            UseCaseItem::Short(short) => short,
            other => panic!("expected short item, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_benefits_gets_default() {
        let value = json!({"use_cases": [{
            "title": "Invoice matcher",
            "description": "Matches invoices to POs",
            "implementation": "Pilot on one vendor"
        }]});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Long);
        let item = long(&result.items[0]);
        assert_eq!(item.title, "Invoice matcher");
        assert_eq!(item.benefits, DEFAULT_BENEFITS);
        assert_eq!(item.implementation, "Pilot on one vendor");
    }

    #[test]
    fn test_list_is_clamped_to_five_in_order() {
        let items: Vec<Value> = (1..=8)
            .map(|i| json!({"prompt_text": format!("Create thing {i}")}))
            .collect();
        let value = json!({ "use_cases": items });
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Short);
        assert_eq!(result.items.len(), 5);
        assert_eq!(short(&result.items[0]).prompt_text, "Create thing 1");
        assert_eq!(short(&result.items[4]).prompt_text, "Create thing 5");
    }

    #[test]
    fn test_empty_list_becomes_single_placeholder() {
        let value = json!({"use_cases": []});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Short);
        assert_eq!(result, placeholder_result(UseCaseFormat::Short));
    }

    #[test]
    fn test_non_list_field_is_replaced_wholesale() {
        let value = json!({"use_cases": "Create a chatbot"});
        assert_eq!(
            enforce_use_cases(Some(&value), UseCaseFormat::Long),
            placeholder_result(UseCaseFormat::Long)
        );
    }

    #[test]
    fn test_unreadable_candidate_is_replaced_wholesale() {
        for value in [json!("Create a chatbot"), json!(42), json!({"other": 1}), json!([1, 2])] {
            assert_eq!(
                enforce_use_cases(Some(&value), UseCaseFormat::Short),
                placeholder_result(UseCaseFormat::Short)
            );
        }
        assert_eq!(
            enforce_use_cases(None, UseCaseFormat::Short),
            placeholder_result(UseCaseFormat::Short)
        );
    }

    #[test]
    fn test_top_level_array_is_the_list() {
        let value = json!([
            {"title": "Invoice Matcher", "description": "d1", "benefits": "b1", "implementation": "i1"},
            {"title": "Spend Forecast", "description": "d2"}
        ]);
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Long);
        assert_eq!(result.items.len(), 2);
        assert_eq!(long(&result.items[1]).title, "Spend Forecast");
        assert_eq!(long(&result.items[1]).benefits, DEFAULT_BENEFITS);
    }

    #[test]
    fn test_bare_item_object_is_a_single_item() {
        let value = json!({"prompt_text": "Design a survey"});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Short);
        assert_eq!(result.items.len(), 1);
        assert_eq!(short(&result.items[0]).prompt_text, "Design a survey");
    }

    #[test]
    fn test_camel_case_keys_are_accepted() {
        let value = json!({"useCases": [{"promptText": "Design a survey"}]});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Short);
        assert_eq!(short(&result.items[0]).prompt_text, "Design a survey");
    }

    #[test]
    fn test_bare_string_items_become_primary_text() {
        let value = json!({"use_cases": ["Build a FAQ bot", 42, {}]});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Short);
        assert_eq!(result.items.len(), 3);
        assert_eq!(short(&result.items[0]).prompt_text, "Build a FAQ bot");
        assert_eq!(short(&result.items[1]).prompt_text, DEFAULT_PROMPT_TEXT);
        assert_eq!(short(&result.items[2]).prompt_text, DEFAULT_PROMPT_TEXT);
    }

    #[test]
    fn test_items_never_mix_formats() {
        let value = json!({"use_cases": [
            {"prompt_text": "Create a chatbot"},
            {"title": "Dashboard", "description": "d", "benefits": "b", "implementation": "i"}
        ]});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Long);
        assert!(result.items.iter().all(|item| matches!(item, UseCaseItem::Long(_))));
        assert_eq!(long(&result.items[0]).title, DEFAULT_TITLE);
    }

    #[test]
    fn test_list_benefits_are_joined() {
        let value = json!({"use_cases": [{
            "title": "t",
            "description": "d",
            "benefits": ["Faster", "Cheaper"],
            "implementation": "i"
        }]});
        let result = enforce_use_cases(Some(&value), UseCaseFormat::Long);
        assert_eq!(long(&result.items[0]).benefits, "Faster; Cheaper");
    }
}
