// Instruction templates for the prompt evaluation pipeline.

use crate::evaluation::models::{EvaluationRequest, Technique};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};

/// Evaluation instruction template.
/// Replace: {technique}, {technique_rules}, {prompt_text}, {json_only}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert prompt engineer who reviews prompts written by students learning prompting techniques.

Decide whether the prompt below correctly applies the {technique} technique.

RULES FOR {technique}:
{technique_rules}

PROMPT TO EVALUATE:
"""
{prompt_text}
"""

Respond with a JSON object with this EXACT schema (no extra fields):
{
  "match": "Yes" | "No" | "Partially",
  "reason": "One or two sentences explaining the verdict, citing the part of the prompt that decided it",
  "rating": "<1-10>/10 - short comment on overall prompt quality"
}

{json_only}"#;

const ONE_SHOT_RULES: &str = "\
- The prompt contains exactly ONE worked example (an input together with its expected output).
- The example appears before the real request and shows the desired format or style.
- The real request is clearly separated from the example.
- Zero examples, or two or more examples, do NOT match this technique.";

const FEW_SHOT_RULES: &str = "\
- The prompt contains TWO OR MORE worked examples (input and expected output pairs).
- The examples follow a consistent pattern the model can generalise from.
- The real request follows the examples and uses the same structure.
- A single example does NOT match this technique.";

const CHAIN_OF_THOUGHT_RULES: &str = "\
- The prompt explicitly asks the model to reason step by step before answering, \
or demonstrates intermediate reasoning steps in an example.
- The reasoning is requested BEFORE the final answer, not after it.
- Simply asking for an answer or an explanation afterwards does NOT match this technique.";

pub fn technique_rules(technique: Technique) -> &'static str {
    match technique {
        Technique::OneShot => ONE_SHOT_RULES,
        Technique::FewShot => FEW_SHOT_RULES,
        Technique::ChainOfThought => CHAIN_OF_THOUGHT_RULES,
    }
}

/// Builds the full instruction for one evaluation. Pure function of the request.
pub fn build_evaluation_instruction(request: &EvaluationRequest) -> String {
    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("technique_rules", technique_rules(request.technique())),
            ("technique", request.technique().label()),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("prompt_text", request.prompt_text()),
        ],
    )
}
