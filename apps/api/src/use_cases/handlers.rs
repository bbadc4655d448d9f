//! Axum route handlers for the Use-Case API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::history::handlers::UserIdQuery;
use crate::history::store::{
    delete_use_case_run, get_use_case_run, insert_use_case_run, list_use_case_runs,
};
use crate::models::records::UseCaseRunRow;
use crate::state::AppState;
use crate::use_cases::departments::{find_known_department, DepartmentProfile, DEPARTMENTS};
use crate::use_cases::models::{UseCaseFormat, UseCaseRequest};
use crate::use_cases::service::generate_use_cases;

#[derive(Debug, Deserialize)]
pub struct CreateUseCasesRequest {
    pub user_id: Uuid,
    pub department: String,
    pub task: String,
}

#[derive(Debug, Serialize)]
pub struct DepartmentsResponse {
    pub format: UseCaseFormat,
    pub departments: &'static [DepartmentProfile],
}

/// Validates a create request for the deployment's format.
///
/// The long format only accepts the enumerated departments and stores the
/// canonical display name.
pub fn validate_use_case_request(
    department: &str,
    task: &str,
    format: UseCaseFormat,
) -> Result<UseCaseRequest, AppError> {
    let request = UseCaseRequest::new(department, task)?;
    match format {
        UseCaseFormat::Short => Ok(request),
        UseCaseFormat::Long => {
            let profile = find_known_department(request.department()).ok_or_else(|| {
                AppError::Validation(format!(
                    "Unknown department '{}'. See GET /api/v1/departments",
                    request.department()
                ))
            })?;
            UseCaseRequest::new(profile.name, request.task())
        }
    }
}

/// POST /api/v1/use-cases
///
/// Generates use cases, stores the run, and returns the stored record.
pub async fn handle_create_use_cases(
    State(state): State<AppState>,
    body: Result<Json<CreateUseCasesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UseCaseRunRow>), AppError> {
    let Json(body) = body?;
    let format = state.config.use_case_format;
    let request = validate_use_case_request(&body.department, &body.task, format)?;

    let result = generate_use_cases(state.llm.as_ref(), &request, format).await?;
    let record = insert_use_case_run(&state.db, body.user_id, &request, format, &result).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/use-cases
pub async fn handle_list_use_cases(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<UseCaseRunRow>>, AppError> {
    Ok(Json(list_use_case_runs(&state.db, params.user_id).await?))
}

/// GET /api/v1/use-cases/:id
pub async fn handle_get_use_cases(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UseCaseRunRow>, AppError> {
    get_use_case_run(&state.db, params.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Use-case run {id} not found")))
}

/// DELETE /api/v1/use-cases/:id
pub async fn handle_delete_use_cases(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if delete_use_case_run(&state.db, params.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Use-case run {id} not found")))
    }
}

/// GET /api/v1/departments
pub async fn handle_departments(State(state): State<AppState>) -> Json<DepartmentsResponse> {
    Json(DepartmentsResponse {
        format: state.config.use_case_format,
        departments: DEPARTMENTS,
    })
}
