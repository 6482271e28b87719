use crate::error::Error;
use crate::matcher::{AssignmentReport, AutoAssigner};
use crate::plagiarism::{PlagiarismChecker, PlagiarismReport};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub submission_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self
            .0
            .downcast_ref::<Error>()
            .map(|e| {
                StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            })
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ========== State ==========

/// Engines shared by the handlers; built once at startup.
pub struct AppState {
    pub matcher: AutoAssigner,
    pub checker: PlagiarismChecker,
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// Both engines are synchronous and may touch disk or the network, so
// they run on the blocking pool.

async fn auto_assign(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AssignmentReport>, AppError> {
    let report = task::spawn_blocking(move || state.matcher.run()).await??;
    Ok(Json(report))
}

async fn check_plagiarism(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<PlagiarismReport>, AppError> {
    let submission_id = req
        .submission_id
        .ok_or_else(|| Error::validation("submission_id is required"))?;

    let report = task::spawn_blocking(move || state.checker.check(submission_id)).await??;
    Ok(Json(report))
}

// ========== Router ==========

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auto_assign", post(auto_assign))
        .route("/plagiarism/check", post(check_plagiarism))
        .with_state(state)
}
