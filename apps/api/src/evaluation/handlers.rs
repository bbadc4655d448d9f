//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::models::{EvaluationRequest, Technique};
use crate::evaluation::service::evaluate_prompt;
use crate::history::handlers::UserIdQuery;
use crate::history::store::{
    delete_evaluation, get_evaluation, insert_evaluation, list_evaluations,
};
use crate::models::records::EvaluationRecordRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    pub user_id: Uuid,
    pub prompt_text: String,
    pub technique: Technique,
}

/// POST /api/v1/evaluations
///
/// Evaluates the prompt, stores the verdict, and returns the stored record.
pub async fn handle_create_evaluation(
    State(state): State<AppState>,
    body: Result<Json<CreateEvaluationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EvaluationRecordRow>), AppError> {
    let Json(body) = body?;
    let request = EvaluationRequest::new(&body.prompt_text, body.technique)?;

    let result = evaluate_prompt(state.llm.as_ref(), &request).await?;
    let record = insert_evaluation(&state.db, body.user_id, &request, &result).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/evaluations
pub async fn handle_list_evaluations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<EvaluationRecordRow>>, AppError> {
    Ok(Json(list_evaluations(&state.db, params.user_id).await?))
}

/// GET /api/v1/evaluations/:id
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<EvaluationRecordRow>, AppError> {
    get_evaluation(&state.db, params.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))
}

/// DELETE /api/v1/evaluations/:id
pub async fn handle_delete_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if delete_evaluation(&state.db, params.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Evaluation {id} not found")))
    }
}
