use tracing::{info, warn};

use crate::llm_client::{GenerationConfig, LlmError, TextGenerator};
use crate::normalize::Confidence;
use crate::use_cases::models::{UseCaseFormat, UseCaseRequest, UseCaseResult};
use crate::use_cases::parse::normalize_use_cases;
use crate::use_cases::prompts::build_use_case_instruction;

pub const SHORT_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 500,
};

/// Four fields per item need a larger output budget.
pub const LONG_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 1500,
};

pub fn generation_config(format: UseCaseFormat) -> GenerationConfig {
    match format {
        UseCaseFormat::Short => SHORT_CONFIG,
        UseCaseFormat::Long => LONG_CONFIG,
    }
}

/// Generates 1..=5 use cases of `format` for a department and task.
///
/// Errors only on provider failure; any answer text is normalized.
pub async fn generate_use_cases(
    llm: &dyn TextGenerator,
    request: &UseCaseRequest,
    format: UseCaseFormat,
) -> Result<UseCaseResult, LlmError> {
    let instruction = build_use_case_instruction(request, format);
    let raw = llm.generate(&instruction, generation_config(format)).await?;

    let normalized = normalize_use_cases(&raw, format);
    if normalized.is_degraded() {
        warn!(
            "Use-case answer was not valid JSON; used {} stage (department={}, format={}, confidence={})",
            normalized.stage(),
            request.department(),
            format,
            normalized.confidence().map_or("none", Confidence::as_str)
        );
    }
    info!(
        "Generated {} use cases (department={}, format={})",
        normalized.value().items.len(),
        request.department(),
        format
    );

    let result = normalized.into_inner();
    Ok(result)
}
