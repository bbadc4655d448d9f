use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored prompt evaluation together with the request that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prompt_text: String,
    pub technique: String,
    /// Serialized as `match` to mirror the evaluation result shape.
    #[serde(rename = "match")]
    pub match_result: String,
    pub reason: String,
    pub rating: String,
    pub created_at: DateTime<Utc>,
}

/// A stored use-case generation run. `items` holds the enforced item list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UseCaseRunRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department: String,
    pub task: String,
    pub format: String,
    pub items: Value,
    pub created_at: DateTime<Utc>,
}
