// Shared prompt fragments.
// Each pipeline that calls the model defines its own prompts.rs alongside it;
// this file holds the pieces every instruction ends with.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Closing instruction appended to every instruction that asks for JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
IMPORTANT: Return ONLY the JSON, no other text. \
Do NOT wrap it in markdown code fences. \
Do NOT add explanations before or after the JSON.";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid placeholder regex"));

/// Fills `{name}` placeholders in one pass over the template.
///
/// Substituted values are never rescanned, so user text containing `{task}`
/// or similar stays literal. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}
