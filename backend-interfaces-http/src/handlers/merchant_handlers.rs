use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::{merchant_queries, transaction_queries};
use backend_application::AppState;
use backend_domain::{
    DateRange, HistoryQuery, MerchantId, MerchantProfile, Transaction, TransactionSummary,
};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(serde::Deserialize)]
pub struct SummaryQuery {
    pub start: Option<chrono::DateTime<chrono::Utc>>,
    pub end: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn list_merchants(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MerchantProfile>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let merchants = merchant_queries::list_merchants(&state).await?;
    Ok(Json(merchants))
}

pub async fn get_merchant(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(merchant_id): Path<String>,
) -> Result<Json<MerchantProfile>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let merchant =
        merchant_queries::get_merchant(&state, &MerchantId(merchant_id)).await?;
    Ok(Json(merchant))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(merchant_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Transaction>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let transactions =
        transaction_queries::history(&state, &MerchantId(merchant_id), query).await?;
    Ok(Json(transactions))
}

pub async fn get_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(merchant_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<TransactionSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let range = DateRange {
        start: query.start,
        end: query.end,
    };
    let summary =
        transaction_queries::summarize(&state, &MerchantId(merchant_id), range).await?;
    Ok(Json(summary))
}
