// Ingest, weight updates, and history queries

mod common;

use backend_application::commands::{ingest_commands, score_commands, weight_commands};
use backend_application::queries::transaction_queries;
use backend_application::AppError;
use backend_domain::{
    DateRange, HistoryQuery, MerchantId, PatternKind, PatternWeights, Severity,
};

use common::{base_time, harness, quiet_history, seed_merchant, transaction};

#[tokio::test]
async fn ingest_stores_batch_and_flags_oversized_transaction() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 6)).await;

    let batch = vec![
        transaction("m-1", "m-1-a", base_time(), 45.0),
        transaction("m-1", "m-1-b", base_time(), 9_500.0),
    ];
    let findings = ingest_commands::process_transactions(&h.state, batch).await.unwrap();

    assert!(findings
        .iter()
        .any(|f| f.pattern == PatternKind::LargeAmount && f.severity == Severity::CRITICAL));
    // Critical findings went out as alerts.
    assert!(!h.alert_service.alerted.lock().unwrap().is_empty());

    let history = h
        .transaction_repo
        .transactions
        .read()
        .await
        .get("m-1")
        .map(Vec::len)
        .unwrap_or(0);
    assert_eq!(history, 8);
}

#[tokio::test]
async fn ingest_for_unknown_merchant_is_not_found() {
    let h = harness();
    let batch = vec![transaction("ghost", "g-1", base_time(), 45.0)];
    let outcome = ingest_commands::process_transactions(&h.state, batch).await;
    assert!(matches!(outcome, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn unknown_merchant_rejects_the_whole_batch_before_storage() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 6)).await;

    let batch = vec![
        transaction("m-1", "m-1-big", base_time(), 9_500.0),
        transaction("ghost", "g-1", base_time(), 45.0),
    ];
    let outcome = ingest_commands::process_transactions(&h.state, batch).await;
    assert!(matches!(outcome, Err(AppError::NotFound(_))));

    // Nothing from the rejected batch was persisted.
    let stored = h.transaction_repo.transactions.read().await;
    assert_eq!(stored.get("m-1").map(Vec::len).unwrap_or(0), 6);
    assert!(stored.get("ghost").is_none());
    // And no alert fired for a batch that never landed.
    assert!(h.alert_service.alerted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn weight_update_rejects_negative_values() {
    let h = harness();
    let outcome = weight_commands::update_pattern_weights(
        &h.state,
        PatternWeights {
            late_night: -1.0,
            ..PatternWeights::default()
        },
    )
    .await;
    assert!(matches!(outcome, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn weight_update_drops_cached_profiles() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 10)).await;
    let merchant_id = MerchantId::from("m-1");

    score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 1);

    weight_commands::update_pattern_weights(
        &h.state,
        PatternWeights {
            large_amount: 40.0,
            ..PatternWeights::default()
        },
    )
    .await
    .unwrap();

    // Same data, but the cache was cleared with the weight change.
    score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 2);
    assert_eq!(h.state.weights.read().await.large_amount, 40.0);
}

#[tokio::test]
async fn history_query_applies_bounds_and_limit() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 10)).await;
    let merchant_id = MerchantId::from("m-1");

    let history = transaction_queries::history(
        &h.state,
        &merchant_id,
        HistoryQuery {
            start: Some(base_time() - chrono::Duration::hours(3)),
            end: Some(base_time()),
            limit: Some(3),
        },
    )
    .await
    .unwrap();

    assert_eq!(history.len(), 3);
    // Newest first.
    assert_eq!(history[0].transaction_id, "m-1-tx0");
    assert!(history[0].timestamp >= history[1].timestamp);
}

#[tokio::test]
async fn summary_reflects_the_full_window() {
    let h = harness();
    let mut history = quiet_history("m-1", 4);
    history[0].status = "failed".to_string();
    seed_merchant(&h, "m-1", history).await;

    let summary = transaction_queries::summarize(
        &h.state,
        &MerchantId::from("m-1"),
        DateRange::unbounded(),
    )
    .await
    .unwrap();

    assert_eq!(summary.total_transactions, 4);
    assert_eq!(summary.unique_customers, 4);
    assert!((summary.success_rate - 75.0).abs() < 1e-9);
    assert!((summary.max_amount - 45.5).abs() < 1e-9);
}
