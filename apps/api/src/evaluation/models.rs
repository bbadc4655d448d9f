use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The prompting style a submitted prompt is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technique {
    OneShot,
    FewShot,
    ChainOfThought,
}

impl Technique {
    /// Wire / storage form: `one-shot`, `few-shot`, `chain-of-thought`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::OneShot => "one-shot",
            Technique::FewShot => "few-shot",
            Technique::ChainOfThought => "chain-of-thought",
        }
    }

    /// Human-readable name used inside instructions.
    pub fn label(&self) -> &'static str {
        match self {
            Technique::OneShot => "One-Shot",
            Technique::FewShot => "Few-Shot",
            Technique::ChainOfThought => "Chain-of-Thought",
        }
    }
}

/// A prompt to evaluate. Constructed per call through `EvaluationRequest::new`,
/// which guarantees a trimmed, non-empty prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    prompt_text: String,
    technique: Technique,
}

impl EvaluationRequest {
    pub fn new(prompt_text: &str, technique: Technique) -> Result<Self, AppError> {
        let prompt_text = prompt_text.trim();
        if prompt_text.is_empty() {
            return Err(AppError::Validation("prompt_text cannot be empty".to_string()));
        }
        Ok(Self {
            prompt_text: prompt_text.to_string(),
            technique,
        })
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }
}

/// The verdict returned to callers. Every field is always populated.
///
/// `match_result` and `rating` are kept exactly as the model wrote them
/// (case included); the UI matches on them case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "match")]
    pub match_result: String,
    pub reason: String,
    pub rating: String,
}
