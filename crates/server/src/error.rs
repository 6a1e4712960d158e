use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Task(OrchestratorError),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Task(err) => {
                let status = match err {
                    OrchestratorError::Authorization => StatusCode::UNAUTHORIZED,
                    OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
                    OrchestratorError::Processing(_) => {
                        tracing::error!("Task processing error: {}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        AppError::Task(err)
    }
}
