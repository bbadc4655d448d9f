//! Prompt evaluation: one instruction, one model call, one enforced verdict.

use tracing::{info, warn};

use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::evaluation::parse::normalize_evaluation;
use crate::evaluation::prompts::build_evaluation_instruction;
use crate::llm_client::{GenerationConfig, LlmError, TextGenerator};
use crate::normalize::Confidence;

/// Low temperature keeps verdicts stable across repeated submissions.
pub const EVALUATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.3,
    max_output_tokens: 500,
};

/// Evaluates a prompt against its declared technique.
///
/// Fails only when the provider call itself fails (missing credential,
/// non-success status, unreadable envelope). Messy model output never fails:
/// it is normalized into a complete `EvaluationResult`.
pub async fn evaluate_prompt(
    llm: &dyn TextGenerator,
    request: &EvaluationRequest,
) -> Result<EvaluationResult, LlmError> {
    let instruction = build_evaluation_instruction(request);
    let raw = llm.generate(&instruction, EVALUATION_CONFIG).await?;

    let normalized = normalize_evaluation(&raw);
    if normalized.is_degraded() {
        warn!(
            "Evaluation answer was not valid JSON; used {} stage (technique={}, confidence={}, match={})",
            normalized.stage(),
            request.technique().as_str(),
            normalized.confidence().map_or("none", Confidence::as_str),
            normalized.value().match_result
        );
    } else {
        info!(
            "Evaluation parsed strictly (technique={}, match={})",
            request.technique().as_str(),
            normalized.value().match_result
        );
    }

    Ok(normalized.into_inner())
}
