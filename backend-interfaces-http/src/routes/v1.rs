use axum::Router;

use backend_application::AppState;

use crate::handlers::{ingest_handlers, merchant_handlers, ops_handlers, score_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/ingest/transactions",
            axum::routing::post(ingest_handlers::ingest_transactions),
        )
        .route(
            "/v1/merchants",
            axum::routing::get(merchant_handlers::list_merchants),
        )
        .route(
            "/v1/merchants/:merchant_id",
            axum::routing::get(merchant_handlers::get_merchant),
        )
        .route(
            "/v1/merchants/:merchant_id/transactions",
            axum::routing::get(merchant_handlers::list_transactions),
        )
        .route(
            "/v1/merchants/:merchant_id/summary",
            axum::routing::get(merchant_handlers::get_summary),
        )
        .route(
            "/v1/merchants/:merchant_id/risk",
            axum::routing::get(score_handlers::get_risk),
        )
        .route("/v1/sweep", axum::routing::post(score_handlers::run_sweep))
        .route(
            "/v1/detect/weights",
            axum::routing::get(ops_handlers::get_weights).put(ops_handlers::update_weights),
        )
        .route(
            "/v1/ops/sweep-status",
            axum::routing::get(ops_handlers::get_sweep_status),
        )
        .route(
            "/v1/ops/seed-demo-data",
            axum::routing::post(ops_handlers::seed_demo_data),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
