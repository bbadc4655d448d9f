use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Item shape produced by this deployment. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseFormat {
    /// `{ prompt_text }` items; department is free text.
    Short,
    /// `{ title, description, benefits, implementation }` items; department
    /// must be one of the known departments.
    Long,
}

impl UseCaseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCaseFormat::Short => "short",
            UseCaseFormat::Long => "long",
        }
    }
}

impl fmt::Display for UseCaseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown use-case format '{0}'")]
pub struct UnknownFormat(String);

impl FromStr for UseCaseFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(UseCaseFormat::Short),
            "long" => Ok(UseCaseFormat::Long),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// A department + task pair. `UseCaseRequest::new` guarantees both are
/// trimmed and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct UseCaseRequest {
    department: String,
    task: String,
}

impl UseCaseRequest {
    pub fn new(department: &str, task: &str) -> Result<Self, AppError> {
        let department = department.trim();
        let task = task.trim();
        if department.is_empty() {
            return Err(AppError::Validation("department cannot be empty".to_string()));
        }
        if task.is_empty() {
            return Err(AppError::Validation("task cannot be empty".to_string()));
        }
        Ok(Self {
            department: department.to_string(),
            task: task.to_string(),
        })
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn task(&self) -> &str {
        &self.task
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUseCase {
    pub prompt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongUseCase {
    pub title: String,
    pub description: String,
    pub benefits: String,
    pub implementation: String,
}

/// One generated idea. All items in a result share the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UseCaseItem {
    Short(ShortUseCase),
    Long(LongUseCase),
}

/// Between 1 and 5 items, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseResult {
    pub items: Vec<UseCaseItem>,
}
