// In-memory store for local development and demos
// Same contract as the ClickHouse store, no persistence across restarts.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use backend_domain::ports::{MerchantRepository, TransactionRepository};
use backend_domain::{DateRange, MerchantId, MerchantProfile, Transaction};

#[derive(Default)]
pub struct MemoryStore {
    merchants: RwLock<HashMap<String, MerchantProfile>>,
    transactions: RwLock<HashMap<String, Vec<Transaction>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MerchantRepository for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn list_merchants(&self) -> Result<Vec<MerchantProfile>> {
        let mut merchants: Vec<MerchantProfile> =
            self.merchants.read().await.values().cloned().collect();
        merchants.sort_by(|a, b| a.merchant_id.cmp(&b.merchant_id));
        Ok(merchants)
    }

    async fn fetch_profile(&self, merchant_id: &MerchantId) -> Result<Option<MerchantProfile>> {
        Ok(self.merchants.read().await.get(merchant_id.as_str()).cloned())
    }

    async fn upsert_merchants(&self, merchants: &[MerchantProfile]) -> Result<()> {
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
    ) -> Result<()> {
        let mut guard = self.merchants.write().await;
        let Some(profile) = guard.get_mut(merchant_id.as_str()) else {
            anyhow::bail!("merchant {} not found", merchant_id);
        };
        profile.risk_score = score;
        profile.risk_computed_at = Some(computed_at);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn insert_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let mut guard = self.transactions.write().await;
        for transaction in transactions {
            guard
                .entry(transaction.merchant_id.clone())
                .or_default()
                .push(transaction.clone());
        }
        Ok(())
    }

    async fn fetch_history(
        &self,
        merchant_id: &MerchantId,
        range: &DateRange,
    ) -> Result<Vec<Transaction>> {
        let mut history: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .get(merchant_id.as_str())
            .map(|transactions| {
                transactions
                    .iter()
                    .filter(|tx| range.contains(tx.timestamp))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        history.sort_by_key(|tx| tx.timestamp);
        Ok(history)
    }
}
