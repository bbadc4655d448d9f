//! Record store for evaluations and use-case runs.
//!
//! Every query is scoped by owner id; a record owned by someone else behaves
//! exactly like a missing one.

use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::evaluation::models::{EvaluationRequest, EvaluationResult};
use crate::models::records::{EvaluationRecordRow, UseCaseRunRow};
use crate::use_cases::models::{UseCaseFormat, UseCaseRequest, UseCaseResult};

pub async fn insert_evaluation(
    pool: &PgPool,
    user_id: Uuid,
    request: &EvaluationRequest,
    result: &EvaluationResult,
) -> Result<EvaluationRecordRow, sqlx::Error> {
    let row = sqlx::query_as::<_, EvaluationRecordRow>(
        r#"
        INSERT INTO evaluations
            (id, user_id, prompt_text, technique, match_result, reason, rating)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(request.prompt_text())
    .bind(request.technique().as_str())
    .bind(&result.match_result)
    .bind(&result.reason)
    .bind(&result.rating)
    .fetch_one(pool)
    .await?;

    info!("Stored evaluation {} for user {}", row.id, user_id);
    Ok(row)
}

pub async fn list_evaluations(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EvaluationRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationRecordRow>(
        "SELECT * FROM evaluations WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_evaluation(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<EvaluationRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationRecordRow>(
        "SELECT * FROM evaluations WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Returns `false` when nothing was deleted.
pub async fn delete_evaluation(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM evaluations WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_use_case_run(
    pool: &PgPool,
    user_id: Uuid,
    request: &UseCaseRequest,
    format: UseCaseFormat,
    result: &UseCaseResult,
) -> Result<UseCaseRunRow, sqlx::Error> {
    let row = sqlx::query_as::<_, UseCaseRunRow>(
        r#"
        INSERT INTO use_case_runs (id, user_id, department, task, format, items)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(request.department())
    .bind(request.task())
    .bind(format.as_str())
    .bind(Json(&result.items))
    .fetch_one(pool)
    .await?;

    info!(
        "Stored use-case run {} ({} items) for user {}",
        row.id,
        result.items.len(),
        user_id
    );
    Ok(row)
}

pub async fn list_use_case_runs(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<UseCaseRunRow>, sqlx::Error> {
    sqlx::query_as::<_, UseCaseRunRow>(
        "SELECT * FROM use_case_runs WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_use_case_run(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<UseCaseRunRow>, sqlx::Error> {
    sqlx::query_as::<_, UseCaseRunRow>(
        "SELECT * FROM use_case_runs WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Returns `false` when nothing was deleted.
pub async fn delete_use_case_run(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM use_case_runs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
