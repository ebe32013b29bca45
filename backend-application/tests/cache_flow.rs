// Result-cache behavior through the scoring command path

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use backend_application::commands::{score_commands, seed_commands};
use backend_application::{AppError, RiskProfileCache};
use backend_domain::{Fingerprint, MerchantId, RiskProfile, TransactionRepository};

use common::{base_time, harness, quiet_history, seed_merchant, transaction};

fn stub_profile(merchant_id: &str, fingerprint: Fingerprint) -> RiskProfile {
    RiskProfile {
        merchant_id: merchant_id.to_string(),
        score: 12.5,
        breakdown: HashMap::new(),
        findings: Vec::new(),
        computed_at: base_time(),
        fingerprint,
    }
}

#[tokio::test]
async fn concurrent_callers_share_one_computation() {
    let cache = Arc::new(RiskProfileCache::new(16));
    let computed = Arc::new(AtomicU64::new(0));
    let merchant_id = MerchantId::from("m-1");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let cache = cache.clone();
        let computed = computed.clone();
        let merchant_id = merchant_id.clone();
        handles.push(tokio::spawn(async move {
            cache
                .get_or_compute(&merchant_id, Fingerprint("5:1000".to_string()), || async move {
                    computed.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                    Ok(stub_profile("m-1", Fingerprint("5:1000".to_string())))
                })
                .await
        }));
    }

    for handle in handles {
        let (profile, _) = handle.await.unwrap().unwrap();
        assert_eq!(profile.score, 12.5);
    }
    assert_eq!(computed.load(Ordering::SeqCst), 1);
    assert_eq!(cache.computations(), 1);
}

#[tokio::test]
async fn stale_fingerprint_triggers_exactly_one_recompute() {
    let cache = RiskProfileCache::new(16);
    let merchant_id = MerchantId::from("m-1");

    let (_, computed) = cache
        .get_or_compute(&merchant_id, Fingerprint("5:1000".to_string()), || async {
            Ok(stub_profile("m-1", Fingerprint("5:1000".to_string())))
        })
        .await
        .unwrap();
    assert!(computed);

    let (_, computed) = cache
        .get_or_compute(&merchant_id, Fingerprint("5:1000".to_string()), || async {
            panic!("fresh entry must not recompute")
        })
        .await
        .unwrap();
    assert!(!computed);

    // New data arrived, fingerprint moves.
    let (profile, computed) = cache
        .get_or_compute(&merchant_id, Fingerprint("6:2000".to_string()), || async {
            Ok(stub_profile("m-1", Fingerprint("6:2000".to_string())))
        })
        .await
        .unwrap();
    assert!(computed);
    assert_eq!(profile.fingerprint.as_str(), "6:2000");
    assert_eq!(cache.computations(), 2);
}

#[tokio::test]
async fn failed_computation_is_not_cached() {
    let cache = RiskProfileCache::new(16);
    let merchant_id = MerchantId::from("m-1");
    let fingerprint = Fingerprint("1:1".to_string());

    let outcome = cache
        .get_or_compute(&merchant_id, fingerprint.clone(), || async {
            Err(anyhow::anyhow!("store unavailable"))
        })
        .await;
    assert!(outcome.is_err());

    // Next caller retries and succeeds.
    let (_, computed) = cache
        .get_or_compute(&merchant_id, fingerprint.clone(), || async {
            Ok(stub_profile("m-1", fingerprint))
        })
        .await
        .unwrap();
    assert!(computed);
    assert_eq!(cache.computations(), 2);
}

#[tokio::test]
async fn capacity_overflow_evicts_least_recently_used() {
    let cache = RiskProfileCache::new(2);
    for id in ["m-1", "m-2", "m-3"] {
        let merchant_id = MerchantId::from(id);
        cache
            .get_or_compute(&merchant_id, Fingerprint("1:1".to_string()), || async move {
                Ok(stub_profile(id, Fingerprint("1:1".to_string())))
            })
            .await
            .unwrap();
    }

    // m-1 was oldest; touching it again recomputes.
    let (_, computed) = cache
        .get_or_compute(&MerchantId::from("m-1"), Fingerprint("1:1".to_string()), || async {
            Ok(stub_profile("m-1", Fingerprint("1:1".to_string())))
        })
        .await
        .unwrap();
    assert!(computed);
    // m-3 is still warm.
    let (_, computed) = cache
        .get_or_compute(&MerchantId::from("m-3"), Fingerprint("1:1".to_string()), || async {
            Ok(stub_profile("m-3", Fingerprint("1:1".to_string())))
        })
        .await
        .unwrap();
    assert!(!computed);
}

#[tokio::test]
async fn repeat_score_request_hits_cache() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 10)).await;
    let merchant_id = MerchantId::from("m-1");

    let first = score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    let second = score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();

    assert_eq!(h.state.cache.computations(), 1);
    assert_eq!(first.score, second.score);
    assert_eq!(first.fingerprint, second.fingerprint);
    // The computed score was written back to the merchant store.
    let writes = h.merchant_repo.score_writes.lock().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "m-1");
}

#[tokio::test]
async fn new_transaction_invalidates_cached_profile() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 10)).await;
    let merchant_id = MerchantId::from("m-1");

    score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 1);

    h.transaction_repo
        .insert_transactions(&[transaction(
            "m-1",
            "m-1-late",
            base_time() + chrono::Duration::minutes(5),
            61.0,
        )])
        .await
        .unwrap();

    score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 2);
}

#[tokio::test]
async fn seeding_demo_data_keeps_unrelated_cache_entries_warm() {
    let h = harness();
    seed_merchant(&h, "m-1", quiet_history("m-1", 10)).await;
    let merchant_id = MerchantId::from("m-1");

    score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 1);

    let options = seed_commands::SeedOptions {
        seed: 7,
        merchants: 3,
        days: 2,
    };
    seed_commands::seed_demo_data(&h.state, options.clone())
        .await
        .unwrap();

    // m-1 is not part of the seeded population; its profile stays warm.
    score_commands::score_merchant(&h.state, &merchant_id, base_time())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 1);

    // A seeded merchant scores fresh, and reseeding drops it again.
    let seeded = MerchantId::from("M0001");
    score_commands::score_merchant(&h.state, &seeded, chrono::Utc::now())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 2);
    seed_commands::seed_demo_data(&h.state, options).await.unwrap();
    score_commands::score_merchant(&h.state, &seeded, chrono::Utc::now())
        .await
        .unwrap();
    assert_eq!(h.state.cache.computations(), 3);
}

#[tokio::test]
async fn unknown_merchant_is_not_found() {
    let h = harness();
    let outcome =
        score_commands::score_merchant(&h.state, &MerchantId::from("ghost"), base_time()).await;
    assert!(matches!(outcome, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn merchant_without_history_is_rejected() {
    let h = harness();
    seed_merchant(&h, "m-1", Vec::new()).await;
    let outcome =
        score_commands::score_merchant(&h.state, &MerchantId::from("m-1"), base_time()).await;
    assert!(matches!(outcome, Err(AppError::BadRequest(_))));
}
