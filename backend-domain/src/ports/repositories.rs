use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{DateRange, MerchantProfile, PatternWeights, Transaction};
use crate::value_objects::MerchantId;

#[async_trait]
pub trait MerchantRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn list_merchants(&self) -> anyhow::Result<Vec<MerchantProfile>>;
    async fn fetch_profile(
        &self,
        merchant_id: &MerchantId,
    ) -> anyhow::Result<Option<MerchantProfile>>;
    async fn upsert_merchants(&self, merchants: &[MerchantProfile]) -> anyhow::Result<()>;
    /// The engine writes back only the computed score, never business
    /// attributes or history.
    async fn update_risk_score(
        &self,
        merchant_id: &MerchantId,
        score: f64,
        computed_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert_transactions(&self, transactions: &[Transaction]) -> anyhow::Result<()>;
    /// Ordered by timestamp ascending; bounds are inclusive.
    async fn fetch_history(
        &self,
        merchant_id: &MerchantId,
        range: &DateRange,
    ) -> anyhow::Result<Vec<Transaction>>;
}

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_pattern_weights(&self, path: &str) -> anyhow::Result<Option<PatternWeights>>;
    async fn save_pattern_weights(
        &self,
        path: &str,
        weights: &PatternWeights,
    ) -> anyhow::Result<()>;
}
