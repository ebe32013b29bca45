// Shared fakes for application-layer tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::{Mutex, RwLock};

use backend_application::{AppState, Metrics, RiskProfileCache};
use backend_domain::ports::{
    AlertService, ConfigRepository, HealthCheckService, MerchantRepository, TransactionRepository,
};
use backend_domain::services::ScoringEngine;
use backend_domain::{
    AnomalyFinding, DateRange, DetectorConfig, MerchantId, MerchantProfile, PatternWeights,
    RuntimeConfig, ScoringConfig, SweepStatus, Transaction,
};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).single().unwrap()
}

pub fn merchant(id: &str) -> MerchantProfile {
    MerchantProfile {
        merchant_id: id.to_string(),
        business_name: format!("{id} Trading"),
        business_type: "retail".to_string(),
        registration_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap(),
        registered: true,
        avg_transaction_amount: 50.0,
        avg_hourly_transactions: 5.0,
        risk_score: 0.0,
        risk_computed_at: None,
    }
}

pub fn transaction(merchant_id: &str, id: &str, ts: DateTime<Utc>, amount: f64) -> Transaction {
    Transaction {
        transaction_id: id.to_string(),
        merchant_id: merchant_id.to_string(),
        timestamp: ts,
        amount,
        customer_id: format!("cust-{id}"),
        device_id: "dev-1".to_string(),
        location: "Oslo".to_string(),
        payment_method: "card".to_string(),
        status: "success".to_string(),
        category: "retail".to_string(),
        platform: "web".to_string(),
    }
}

/// Quiet daytime history that no detector fires on.
pub fn quiet_history(merchant_id: &str, count: usize) -> Vec<Transaction> {
    (0..count)
        .map(|i| {
            transaction(
                merchant_id,
                &format!("{merchant_id}-tx{i}"),
                base_time() - chrono::Duration::minutes(40 * i as i64),
                42.50 + i as f64,
            )
        })
        .collect()
}

#[derive(Default)]
pub struct FakeMerchantRepo {
    pub merchants: RwLock<HashMap<String, MerchantProfile>>,
    pub score_writes: Mutex<Vec<(String, f64)>>,
}

#[async_trait]
impl MerchantRepository for FakeMerchantRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn list_merchants(&self) -> anyhow::Result<Vec<MerchantProfile>> {
        Ok(self.merchants.read().await.values().cloned().collect())
    }

    async fn fetch_profile(
        &self,
        merchant_id: &MerchantId,
    ) -> anyhow::Result<Option<MerchantProfile>> {
        Ok(self.merchants.read().await.get(merchant_id.as_str()).cloned())
    }

    async fn upsert_merchants(&self, merchants: &[MerchantProfile]) -> anyhow::Result<()> {
        let mut guard = self.merchants.write().await;
        for merchant in merchants {
            guard.insert(merchant.merchant_id.clone(), merchant.clone());
        }
        Ok(())
    }

    async fn update_risk_score(
        &self,
        merchant_id: &MerchantId,
        score: f64,
        computed_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if let Some(profile) = self.merchants.write().await.get_mut(merchant_id.as_str()) {
            profile.risk_score = score;
            profile.risk_computed_at = Some(computed_at);
        }
        self.score_writes
            .lock()
            .await
            .push((merchant_id.to_string(), score));
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTransactionRepo {
    pub transactions: RwLock<HashMap<String, Vec<Transaction>>>,
}

#[async_trait]
impl TransactionRepository for FakeTransactionRepo {
    async fn insert_transactions(&self, transactions: &[Transaction]) -> anyhow::Result<()> {
        let mut guard = self.transactions.write().await;
        for tx in transactions {
            guard.entry(tx.merchant_id.clone()).or_default().push(tx.clone());
        }
        Ok(())
    }

    async fn fetch_history(
        &self,
        merchant_id: &MerchantId,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Transaction>> {
        let mut history: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .get(merchant_id.as_str())
            .map(|txs| {
                txs.iter()
                    .filter(|tx| range.contains(tx.timestamp))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        history.sort_by_key(|tx| tx.timestamp);
        Ok(history)
    }
}

#[derive(Default)]
pub struct FakeConfigRepo {
    pub stored: Mutex<Option<PatternWeights>>,
}

#[async_trait]
impl ConfigRepository for FakeConfigRepo {
    async fn load_pattern_weights(&self, _path: &str) -> anyhow::Result<Option<PatternWeights>> {
        Ok(self.stored.lock().await.clone())
    }

    async fn save_pattern_weights(
        &self,
        _path: &str,
        weights: &PatternWeights,
    ) -> anyhow::Result<()> {
        *self.stored.lock().await = Some(weights.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAlertService {
    pub alerted: std::sync::Mutex<Vec<AnomalyFinding>>,
}

#[async_trait]
impl AlertService for RecordingAlertService {
    fn spawn_alerts(&self, _config: RuntimeConfig, findings: Vec<AnomalyFinding>) {
        self.alerted.lock().unwrap().extend(findings);
    }

    async fn check_alert_target(&self, _config: &RuntimeConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheckService for AlwaysHealthy {
    async fn check_database(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn check_alert_target(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        storage_backend: "memory".to_string(),
        report_dir: "./reports".to_string(),
        public_base_url: "http://localhost".to_string(),
        webhook_url: None,
        alert_webhook_url: None,
        alert_webhook_token: None,
        weights_path: "./weights.yaml".to_string(),
        fingerprint_strategy: "count-latest".to_string(),
        cache_capacity: 64,
        worker_pool_size: 8,
        batch_timeout_seconds: 30,
        sweep_hour: 2,
        sweep_minute: 0,
        max_body_bytes: 1_048_576,
        request_timeout_seconds: 30,
        detector: DetectorConfig::default(),
        scoring: ScoringConfig::default(),
        weights: PatternWeights::default(),
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub merchant_repo: Arc<FakeMerchantRepo>,
    pub transaction_repo: Arc<FakeTransactionRepo>,
    pub alert_service: Arc<RecordingAlertService>,
}

pub fn harness() -> TestHarness {
    let config = test_config();
    let merchant_repo = Arc::new(FakeMerchantRepo::default());
    let transaction_repo = Arc::new(FakeTransactionRepo::default());
    let config_repo = Arc::new(FakeConfigRepo::default());
    let alert_service = Arc::new(RecordingAlertService::default());
    let weights = config.weights.clone();
    let state = AppState {
        config,
        merchant_repo: merchant_repo.clone(),
        transaction_repo: transaction_repo.clone(),
        config_repo,
        alert_service: alert_service.clone(),
        health: Arc::new(AlwaysHealthy),
        engine: Arc::new(ScoringEngine::default()),
        cache: Arc::new(RiskProfileCache::new(64)),
        weights: Arc::new(RwLock::new(weights)),
        metrics: Arc::new(Metrics::default()),
        sweep_status: Arc::new(RwLock::new(SweepStatus::default())),
    };
    TestHarness {
        state,
        merchant_repo,
        transaction_repo,
        alert_service,
    }
}

pub async fn seed_merchant(harness: &TestHarness, id: &str, history: Vec<Transaction>) {
    harness
        .merchant_repo
        .upsert_merchants(&[merchant(id)])
        .await
        .unwrap();
    harness
        .transaction_repo
        .insert_transactions(&history)
        .await
        .unwrap();
}
