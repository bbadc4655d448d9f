//! Use-case answer normalization.
//!
//! Strict JSON first. Otherwise an ordered list of matchers is tried and the
//! first one that finds anything wins:
//! - short form: action-verb lines, numbered lines, bulleted lines, then quoted
//!   `prompt_text` values left in broken JSON;
//! - long form: labelled blocks ("Use case", "Solution", "Idea"), numbered
//!   blocks, bulleted blocks.
//! If nothing matches, one placeholder item echoes a bounded slice of the text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::normalize::{
    first_match, parse_strict, strip_json_noise, truncate_chars, Confidence, Matcher, Normalized,
    MAX_ITEMS, MAX_RAW_ECHO_CHARS,
};
use crate::use_cases::contract::{enforce_use_cases, item_list};
use crate::use_cases::models::{UseCaseFormat, UseCaseResult};

pub const EXTRACTED_BENEFITS: &str = "Benefits could not be extracted automatically; \
    review the description for the expected impact.";
pub const EXTRACTED_IMPLEMENTATION: &str = "Implementation steps could not be extracted \
    automatically; start with a small pilot and refine from there.";

static ACTION_VERB_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*((?:create|build|develop|implement|design)\b.*)$")
        .expect("valid action verb regex")
});

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+(.+)$").expect("valid numbered regex"));

static BULLETED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*•][ \t]+(.+)$").expect("valid bulleted regex"));

static QUOTED_PROMPT_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:prompt_text|promptText)"\s*:\s*"((?:[^"\\]|\\.)+)""#)
        .expect("valid prompt text regex")
});

/// A header line for the labelled-block matcher. The label must be followed by
/// an optional number and then a separator or the end of the line, so prose
/// such as "Solution architecture is..." is not mistaken for a header.
static LABELLED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#{1,6}\s*)?[*_]*\s*(?:\d+[.)]\s*)?[*_]*\s*(?:use[\s-]*case|solution|idea)(?:\s*#?\s*\d+)?\s*[*_]*\s*(?:[:.)\-–]|$)[*_\s]*(.*)$",
    )
    .expect("valid labelled header regex")
});

/// `1. Title`, `### 1. Title`, `**1. Title**`.
static NUMBERED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:#{1,6}\s*)?[*_]*\s*\d+[.)]\s+(.+)$").expect("valid numbered header regex")
});

/// `- Title`, `### - Title`. At most one space of indent, so indented
/// sub-bullets stay in the body of the block above them.
static BULLETED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ ?(?:#{1,6}\s*)?[-*•]\s+(.+)$").expect("valid bulleted header regex")
});

static BODY_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*•]\s+").expect("valid body bullet regex"));

static TITLE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:title|name)\s*:\s*").expect("valid title label regex"));

/// A labelled body line: `Description: ...`, `Benefits: ...`, `Implementation: ...`.
static BODY_FIELD_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(description|details|benefits?|implementation|steps)\s*:\s*(.*)$")
        .expect("valid body field regex")
});

const SHORT_MATCHERS: [Matcher<Vec<String>>; 4] = [
    action_verb_lines,
    numbered_lines,
    bulleted_lines,
    quoted_prompt_texts,
];

const LONG_MATCHERS: [Matcher<Vec<TextBlock>>; 3] =
    [labelled_blocks, numbered_blocks, bulleted_blocks];

// ────────────────────────────────────────────────────────────────────────────
// Short form
// ────────────────────────────────────────────────────────────────────────────

fn collect_lines(re: &Regex, text: &str) -> Option<Vec<String>> {
    let lines: Vec<String> = re
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_ITEMS)
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

pub fn action_verb_lines(text: &str) -> Option<Vec<String>> {
    collect_lines(&ACTION_VERB_LINE, text)
}

pub fn numbered_lines(text: &str) -> Option<Vec<String>> {
    collect_lines(&NUMBERED_LINE, text)
}

pub fn bulleted_lines(text: &str) -> Option<Vec<String>> {
    collect_lines(&BULLETED_LINE, text)
}

pub fn quoted_prompt_texts(text: &str) -> Option<Vec<String>> {
    collect_lines(&QUOTED_PROMPT_TEXT, text).map(|lines| {
        lines
            .into_iter()
            .map(|line| line.replace("\\\"", "\"").replace("\\n", " "))
            .collect()
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Long form
// ────────────────────────────────────────────────────────────────────────────

/// A header line plus the lines under it. Benefits and implementation are
/// only set when the body labels them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub title: String,
    pub description: String,
    pub benefits: Option<String>,
    pub implementation: Option<String>,
}

#[derive(Clone, Copy)]
enum BodyField {
    Description,
    Benefits,
    Implementation,
}

#[derive(Default)]
struct PendingBlock {
    title: String,
    body: Vec<String>,
    benefits: Vec<String>,
    implementation: Vec<String>,
    /// Unlabelled lines continue the most recently labelled field.
    field: Option<BodyField>,
}

fn joined(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

impl PendingBlock {
    fn push_body_line(&mut self, raw: &str) {
        let line = clean_body_line(raw);
        if line.is_empty() {
            return;
        }
        let (field, text) = match BODY_FIELD_LABEL.captures(&line) {
            Some(caps) => {
                let field = match caps[1].to_lowercase().as_str() {
                    "benefit" | "benefits" => BodyField::Benefits,
                    "implementation" | "steps" => BodyField::Implementation,
                    _ => BodyField::Description,
                };
                self.field = Some(field);
                (field, caps[2].trim().to_string())
            }
            None => (self.field.unwrap_or(BodyField::Description), line.clone()),
        };
        if text.is_empty() {
            return;
        }
        match field {
            BodyField::Description => self.body.push(text),
            BodyField::Benefits => self.benefits.push(text),
            BodyField::Implementation => self.implementation.push(text),
        }
    }

    fn finish(self) -> Option<TextBlock> {
        let mut title = self.title;
        let mut description = self.body.join(" ");

        // "1. **Title**: one-line description"
        if description.is_empty() {
            if let Some((head, tail)) = title.split_once(':') {
                let (head, tail) = (clean_title(head), tail.trim().to_string());
                if !head.is_empty() && !tail.is_empty() {
                    title = head;
                    description = tail;
                }
            }
        }

        if title.is_empty() {
            None
        } else {
            Some(TextBlock {
                title,
                description,
                benefits: joined(self.benefits),
                implementation: joined(self.implementation),
            })
        }
    }
}

fn clean_title(raw: &str) -> String {
    let stripped = raw.replace("**", "").replace("__", "");
    let trimmed = stripped
        .trim_matches(|c: char| c == '*' || c == '_' || c == '#' || c.is_whitespace());
    TITLE_LABEL
        .replace(trimmed, "")
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn clean_body_line(raw: &str) -> String {
    let unbulleted = BODY_BULLET.replace(raw, "");
    unbulleted.replace("**", "").replace("__", "").trim().to_string()
}

/// Splits text into blocks at every line matching `header`.
///
/// Capture group 1 of the header is the title; when it is empty the next
/// non-empty line becomes the title. Text before the first header is ignored.
fn split_blocks(text: &str, header: &Regex) -> Option<Vec<TextBlock>> {
    let mut blocks = Vec::new();
    let mut current: Option<PendingBlock> = None;

    for line in text.lines() {
        if let Some(caps) = header.captures(line) {
            if let Some(block) = current.take().and_then(PendingBlock::finish) {
                blocks.push(block);
            }
            current = Some(PendingBlock {
                title: clean_title(caps.get(1).map_or("", |m| m.as_str())),
                ..PendingBlock::default()
            });
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }
        if block.title.is_empty() {
            block.title = clean_title(line);
        } else {
            block.push_body_line(line);
        }
    }
    if let Some(block) = current.and_then(PendingBlock::finish) {
        blocks.push(block);
    }

    blocks.truncate(MAX_ITEMS);
    if blocks.is_empty() {
        None
    } else {
        Some(blocks)
    }
}

pub fn labelled_blocks(text: &str) -> Option<Vec<TextBlock>> {
    split_blocks(text, &LABELLED_HEADER)
}

pub fn numbered_blocks(text: &str) -> Option<Vec<TextBlock>> {
    split_blocks(text, &NUMBERED_HEADER)
}

pub fn bulleted_blocks(text: &str) -> Option<Vec<TextBlock>> {
    split_blocks(text, &BULLETED_HEADER)
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Stage 2, shaped as the candidate object the contract expects.
pub fn extract_use_cases(raw: &str, format: UseCaseFormat) -> Option<Value> {
    let items: Vec<Value> = match format {
        UseCaseFormat::Short => first_match(raw, &SHORT_MATCHERS)?
            .into_iter()
            .map(|prompt_text| json!({ "prompt_text": prompt_text }))
            .collect(),
        UseCaseFormat::Long => first_match(raw, &LONG_MATCHERS)?
            .into_iter()
            .map(|block| {
                json!({
                    "title": block.title,
                    "description": block.description,
                    "benefits": block.benefits.as_deref().unwrap_or(EXTRACTED_BENEFITS),
                    "implementation": block
                        .implementation
                        .as_deref()
                        .unwrap_or(EXTRACTED_IMPLEMENTATION),
                })
            })
            .collect(),
    };
    Some(json!({ "use_cases": items }))
}

fn fallback_candidate(raw: &str, format: UseCaseFormat) -> Value {
    let cleaned = strip_json_noise(raw);
    let notice = if cleaned.is_empty() {
        "The AI response could not be parsed and was empty.".to_string()
    } else {
        format!(
            "The AI response could not be parsed into use cases. Raw response: {}",
            truncate_chars(&cleaned, MAX_RAW_ECHO_CHARS)
        )
    };
    let item = match format {
        UseCaseFormat::Short => json!({ "prompt_text": notice }),
        UseCaseFormat::Long => json!({
            "title": "Unparsed AI Response",
            "description": notice,
        }),
    };
    json!({ "use_cases": [item] })
}

/// Runs all three stages over one model answer. Deterministic.
pub fn normalize_use_cases(raw: &str, format: UseCaseFormat) -> Normalized<UseCaseResult> {
    // JSON that holds no item list (a quoted fragment, say) is not an answer.
    if let Some(value) = parse_strict(raw).filter(|value| item_list(value).is_some()) {
        return Normalized::ParsedStrict(enforce_use_cases(Some(&value), format));
    }

    match extract_use_cases(raw, format) {
        Some(value) => Normalized::ExtractedPartial {
            value: enforce_use_cases(Some(&value), format),
            confidence: Confidence::Low,
        },
        None => Normalized::Fallback(enforce_use_cases(
            Some(&fallback_candidate(raw, format)),
            format,
        )),
    }
}
