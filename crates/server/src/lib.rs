pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IITM Task Handler API",
        version = "0.1.0",
        description = "Automated code generation and GitHub repository management for IITM tasks"
    ),
    paths(
        routes::root,
        routes::health_check,
        routes::info,
        routes::api_endpoint,
        routes::iitm_task,
        routes::iitm_round2,
    ),
    components(schemas(
        routes::RootResponse,
        routes::HealthResponse,
        routes::InfoResponse,
        error::ErrorResponse,
        handler_core::TaskRequest,
        handler_core::Attachment,
        handler_core::TaskResponse,
        handler_core::CreateTaskResponse,
        handler_core::ModifyTaskResponse,
        handler_core::EvaluationPayload,
    )),
    tags(
        (name = "health", description = "Liveness and service information"),
        (name = "tasks", description = "Task submission endpoints"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/", get(routes::root))
        .route("/health", get(routes::health_check))
        .route("/info", get(routes::info))
        .route("/api-endpoint", post(routes::api_endpoint))
        .route("/iitm-task", post(routes::iitm_task))
        .route("/iitm-round2", post(routes::iitm_round2))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
