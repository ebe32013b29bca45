use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

use backend_application::commands::{seed_commands, weight_commands};
use backend_application::queries::{sweep_queries, weight_queries};
use backend_application::AppState;
use backend_domain::{PatternWeights, SweepStatus};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_weights(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PatternWeights>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let weights = weight_queries::current_weights(&state).await;
    Ok(Json(weights))
}

pub async fn update_weights(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PatternWeights>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    weight_commands::update_pattern_weights(&state, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_sweep_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SweepStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let status = sweep_queries::sweep_status(&state).await;
    Ok(Json(status))
}

pub async fn seed_demo_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<seed_commands::SeedOptions>>,
) -> Result<Json<seed_commands::SeedSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let options = payload.map(|Json(options)| options).unwrap_or_default();
    let summary = seed_commands::seed_demo_data(&state, options)
        .await
        .map_err(|err| HttpError::Internal(err.to_string()))?;
    Ok(Json(summary))
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    match state.health.check_database().await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
