// Prompt evaluation pipeline.
// Instruction → model call → normalization → contract enforcement.
// All model calls go through llm_client.

pub mod contract;
pub mod handlers;
pub mod models;
pub mod parse;
pub mod prompts;
pub mod service;
