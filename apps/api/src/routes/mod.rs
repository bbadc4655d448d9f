pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluations;
use crate::history::handlers as history;
use crate::state::AppState;
use crate::use_cases::handlers as use_cases;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Evaluation API
        .route(
            "/api/v1/evaluations",
            post(evaluations::handle_create_evaluation).get(evaluations::handle_list_evaluations),
        )
        .route(
            "/api/v1/evaluations/:id",
            get(evaluations::handle_get_evaluation).delete(evaluations::handle_delete_evaluation),
        )
        // Use-Case API
        .route(
            "/api/v1/use-cases",
            post(use_cases::handle_create_use_cases).get(use_cases::handle_list_use_cases),
        )
        .route(
            "/api/v1/use-cases/:id",
            get(use_cases::handle_get_use_cases).delete(use_cases::handle_delete_use_cases),
        )
        .route("/api/v1/departments", get(use_cases::handle_departments))
        // History
        .route("/api/v1/history", get(history::handle_history))
        .with_state(state)
}
