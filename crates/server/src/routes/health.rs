use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const API_TITLE: &str = "IITM Task Handler API";

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    message: String,
    status: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct InfoResponse {
    title: String,
    description: String,
    version: String,
    endpoints: BTreeMap<String, String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = RootResponse)
    ),
    tag = "health"
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: API_TITLE.to_string(),
        status: "running".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/info",
    responses(
        (status = 200, description = "API description and endpoint listing", body = InfoResponse)
    ),
    tag = "health"
)]
pub async fn info() -> Json<InfoResponse> {
    let endpoints = [
        ("POST /api-endpoint", "Handle IITM task submission (Round 1 & 2)"),
        ("POST /iitm-task", "Round 1 task submission"),
        ("POST /iitm-round2", "Round 2 modification"),
        ("GET /health", "Health check"),
        ("GET /info", "API information"),
    ]
    .into_iter()
    .map(|(route, description)| (route.to_string(), description.to_string()))
    .collect();

    Json(InfoResponse {
        title: API_TITLE.to_string(),
        description: "Automated code generation and GitHub repository management system for IITM tasks".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
