use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use handler_core::{Round, TaskRequest, TaskResponse};
use orchestrator::RoutePolicy;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// Malformed JSON is reported with the same `{detail}` body as other rejections.
fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}

async fn run(state: &AppState, body: Bytes, policy: RoutePolicy) -> Result<Json<TaskResponse>, AppError> {
    let body = parse_body(&body)?;
    let outcome = state.orchestrator.handle_json(body, policy).await?;

    if outcome.callback.is_some() {
        debug!(run_id = %outcome.run_id, "Evaluation callback running in background");
    }

    Ok(Json(outcome.response))
}

#[utoipa::path(
    post,
    path = "/api-endpoint",
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Task handled", body = TaskResponse),
        (status = 400, description = "Malformed body, bad round or missing repo_name", body = ErrorResponse),
        (status = 401, description = "Invalid secret", body = ErrorResponse),
        (status = 500, description = "Generation or publishing failed", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn api_endpoint(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TaskResponse>, AppError> {
    run(&state, body, RoutePolicy::FromBody).await
}

#[utoipa::path(
    post,
    path = "/iitm-task",
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Repository created", body = TaskResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid secret", body = ErrorResponse),
        (status = 500, description = "Generation or publishing failed", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn iitm_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TaskResponse>, AppError> {
    run(&state, body, RoutePolicy::Force(Round::Create)).await
}

#[utoipa::path(
    post,
    path = "/iitm-round2",
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Repository updated", body = TaskResponse),
        (status = 400, description = "Malformed body or missing repo_name", body = ErrorResponse),
        (status = 401, description = "Invalid secret", body = ErrorResponse),
        (status = 500, description = "Publishing failed", body = ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn iitm_round2(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TaskResponse>, AppError> {
    run(&state, body, RoutePolicy::Force(Round::Modify)).await
}
