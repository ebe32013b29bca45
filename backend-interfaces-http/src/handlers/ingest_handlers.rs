use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::{error, warn};

use backend_application::commands::ingest_commands;
use backend_application::AppState;
use backend_domain::AnomalyFinding;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_transactions};

#[derive(serde::Serialize)]
pub struct IngestResponse {
    pub accepted: usize,
    pub findings: Vec<AnomalyFinding>,
}

pub async fn ingest_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<IngestResponse>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let transactions = parse_transactions(&headers, &body).map_err(|err| {
        error!("failed to parse ingest body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let original_len = transactions.len();
    let transactions = transactions
        .into_iter()
        .filter(|tx| {
            !(tx.transaction_id.trim().is_empty()
                || tx.merchant_id.trim().is_empty()
                || !tx.amount.is_finite()
                || tx.amount < 0.0)
        })
        .collect::<Vec<_>>();
    if transactions.len() != original_len {
        warn!(
            "dropped {} invalid transactions (blank ids or bad amount)",
            original_len - transactions.len()
        );
    }
    if transactions.is_empty() {
        return Ok((
            StatusCode::NO_CONTENT,
            Json(IngestResponse {
                accepted: 0,
                findings: Vec::new(),
            }),
        ));
    }

    let accepted = transactions.len();
    let findings = ingest_commands::process_transactions(&state, transactions).await?;
    Ok((StatusCode::OK, Json(IngestResponse { accepted, findings })))
}
