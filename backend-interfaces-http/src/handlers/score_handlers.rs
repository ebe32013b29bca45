use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;

use backend_application::commands::{score_commands, sweep_commands};
use backend_application::AppState;
use backend_domain::{MerchantId, RiskProfile, RiskQuery, SweepReport};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_risk(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(merchant_id): Path<String>,
    Query(query): Query<RiskQuery>,
) -> Result<Json<RiskProfile>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let profile =
        score_commands::score_merchant(&state, &MerchantId(merchant_id), as_of).await?;
    Ok(Json(profile))
}

pub async fn run_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SweepReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let cancel = Arc::new(AtomicBool::new(false));
    let report = sweep_commands::run_sweep(&state, Utc::now(), cancel).await?;
    Ok(Json(report))
}
