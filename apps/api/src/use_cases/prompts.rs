// Instruction templates for the use-case generation pipeline.

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::normalize::MAX_ITEMS;
use crate::use_cases::departments::department_context;
use crate::use_cases::models::{UseCaseFormat, UseCaseRequest};

/// Short-form template.
/// Replace: {max_items}, {department_context}, {json_only}, {department}, {task}
pub const SHORT_USE_CASE_TEMPLATE: &str = r#"You are an AI adoption consultant helping a company department put generative AI to work.

DEPARTMENT: {department}
DEPARTMENT CONTEXT: {department_context}
TASK: {task}

Generate up to {max_items} ready-to-use prompts that someone in this department could paste into an AI assistant to help with the task.

RULES:
1. Every prompt starts with an action verb (Create, Build, Develop, Implement, Design, ...)
2. Every prompt is specific to the department and the task, never generic advice
3. Every prompt is a single sentence or short paragraph, usable as-is
4. No numbering, no bullet characters inside the prompt text

Return a JSON object with this EXACT schema:
{
  "use_cases": [
    {"prompt_text": "Create a ..."}
  ]
}

{json_only}"#;

/// Long-form template.
/// Replace: {max_items}, {department_context}, {json_only}, {department}, {task}
pub const LONG_USE_CASE_TEMPLATE: &str = r#"You are an AI adoption consultant helping a company department put generative AI to work.

DEPARTMENT: {department}
DEPARTMENT CONTEXT: {department_context}
TASK: {task}

Propose up to {max_items} concrete AI use cases that would help this department with the task.

RULES:
1. Each use case has a short, descriptive title (under 10 words)
2. The description explains what the AI does and who uses it (2-3 sentences)
3. Benefits name the measurable improvement (time saved, quality, cost)
4. Implementation lists the first practical steps to pilot the idea
5. Use cases must be distinct from one another and realistic for the department

Return a JSON object with this EXACT schema:
{
  "use_cases": [
    {
      "title": "Short title",
      "description": "What the AI does and for whom",
      "benefits": "Expected measurable benefits",
      "implementation": "First steps to implement"
    }
  ]
}

{json_only}"#;

/// Builds the full instruction for one request. Pure function of its inputs.
pub fn build_use_case_instruction(request: &UseCaseRequest, format: UseCaseFormat) -> String {
    let template = match format {
        UseCaseFormat::Short => SHORT_USE_CASE_TEMPLATE,
        UseCaseFormat::Long => LONG_USE_CASE_TEMPLATE,
    };

    let max_items = MAX_ITEMS.to_string();
    fill_template(
        template,
        &[
            ("max_items", max_items.as_str()),
            ("department_context", department_context(request.department())),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("department", request.department()),
            ("task", request.task()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::departments::GENERIC_CONTEXT;

    #[test]
    fn test_short_instruction_embeds_inputs_and_schema() {
        let request = UseCaseRequest::new("Sales", "Write follow-up emails").unwrap();
        let instruction = build_use_case_instruction(&request, UseCaseFormat::Short);
        assert!(instruction.contains("DEPARTMENT: Sales"));
        assert!(instruction.contains("TASK: Write follow-up emails"));
        assert!(instruction.contains("Lead qualification"));
        assert!(instruction.contains("\"prompt_text\""));
        assert!(instruction.contains("up to 5"));
        assert!(instruction.contains("Return ONLY the JSON"));
    }

    #[test]
    fn test_long_instruction_asks_for_all_fields() {
        let request = UseCaseRequest::new("Finance", "Month-end close").unwrap();
        let instruction = build_use_case_instruction(&request, UseCaseFormat::Long);
        for field in ["\"title\"", "\"description\"", "\"benefits\"", "\"implementation\""] {
            assert!(instruction.contains(field), "missing {field}");
        }
        assert!(!instruction.contains("\"prompt_text\""));
    }

    #[test]
    fn test_unknown_department_uses_generic_context() {
        let request = UseCaseRequest::new("Space Logistics Lab", "Plan launches").unwrap();
        // "logistics" maps to Operations through containment
        let instruction = build_use_case_instruction(&request, UseCaseFormat::Short);
        assert!(instruction.contains("supply chain"));

        let request = UseCaseRequest::new("Zoo Keepers", "Feed animals").unwrap();
        let instruction = build_use_case_instruction(&request, UseCaseFormat::Short);
        assert!(instruction.contains(GENERIC_CONTEXT));
    }

    #[test]
    fn test_user_text_with_placeholder_syntax_stays_literal() {
        let request = UseCaseRequest::new("Ops {task}", "Plan {department} shifts").unwrap();
        let instruction = build_use_case_instruction(&request, UseCaseFormat::Short);
        assert!(instruction.contains("DEPARTMENT: Ops {task}"));
        assert!(instruction.contains("TASK: Plan {department} shifts"));
    }

    #[test]
    fn test_no_placeholders_left_behind() {
        let request = UseCaseRequest::new("Legal", "Review NDAs").unwrap();
        for format in [UseCaseFormat::Short, UseCaseFormat::Long] {
            let instruction = build_use_case_instruction(&request, format);
            for placeholder in ["{department}", "{task}", "{max_items}", "{json_only}"] {
                assert!(!instruction.contains(placeholder));
            }
        }
    }
}
