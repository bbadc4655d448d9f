//! Axum route handlers for the combined history view.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::history::store::{list_evaluations, list_use_case_runs};
use crate::models::records::{EvaluationRecordRow, UseCaseRunRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// One row of the history view, tagged with its kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    Evaluation(EvaluationRecordRow),
    UseCases(UseCaseRunRow),
}

impl HistoryEntry {
    fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        match self {
            HistoryEntry::Evaluation(row) => row.created_at,
            HistoryEntry::UseCases(row) => row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
}

/// Merges both record kinds into one list, newest first.
pub fn merge_history(
    evaluations: Vec<EvaluationRecordRow>,
    runs: Vec<UseCaseRunRow>,
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = evaluations
        .into_iter()
        .map(HistoryEntry::Evaluation)
        .chain(runs.into_iter().map(HistoryEntry::UseCases))
        .collect();
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.created_at()));
    entries
}

/// GET /api/v1/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let evaluations = list_evaluations(&state.db, params.user_id).await?;
    let runs = list_use_case_runs(&state.db, params.user_id).await?;
    Ok(Json(HistoryResponse {
        entries: merge_history(evaluations, runs),
    }))
}
