// Use-case generation pipeline.
// Department + task in, 1..=5 items of the deployment's format out.

pub mod contract;
pub mod departments;
pub mod handlers;
pub mod models;
pub mod parse;
pub mod prompts;
pub mod service;
