// ClickHouse-backed persistence
// Merchants live in a ReplacingMergeTree keyed by merchant_id, so an
// upsert is a plain insert and reads go through FINAL.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clickhouse::Client;

use backend_domain::ports::{MerchantRepository, TransactionRepository};
use backend_domain::{
    DateRange, MerchantId, MerchantProfile, MerchantRow, Transaction, TransactionRow,
};

#[derive(Clone)]
pub struct ClickhouseStore {
    client: Client,
    database: String,
}

impl ClickhouseStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }
}

const MERCHANT_COLUMNS: &str = "merchant_id, business_name, business_type, registration_date, \
     registered, avg_transaction_amount, avg_hourly_transactions, risk_score, risk_computed_at";

const TRANSACTION_COLUMNS: &str = "transaction_id, merchant_id, timestamp, amount, customer_id, \
     device_id, location, payment_method, status, category, platform";

#[async_trait]
impl MerchantRepository for ClickhouseStore {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_merchants = r#"
CREATE TABLE IF NOT EXISTS merchants (
    merchant_id String,
    business_name String,
    business_type String,
    registration_date DateTime64(3),
    registered Bool,
    avg_transaction_amount Float64,
    avg_hourly_transactions Float64,
    risk_score Float64,
    risk_computed_at Int64
) ENGINE = ReplacingMergeTree(risk_computed_at)
ORDER BY merchant_id
"#;
        self.client.query(create_merchants).execute().await?;

        let create_transactions = r#"
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id String,
    merchant_id String,
    timestamp DateTime64(3),
    amount Float64,
    customer_id String,
    device_id String,
    location String,
    payment_method String,
    status String,
    category String,
    platform String
) ENGINE = MergeTree
PARTITION BY toDate(timestamp)
ORDER BY (merchant_id, timestamp)
"#;
        self.client.query(create_transactions).execute().await?;
        Ok(())
    }

    async fn list_merchants(&self) -> Result<Vec<MerchantProfile>> {
        let query = format!("SELECT {MERCHANT_COLUMNS} FROM merchants FINAL ORDER BY merchant_id");
        let rows = self.client.query(&query).fetch_all::<MerchantRow>().await?;
        Ok(rows.into_iter().map(MerchantProfile::from).collect())
    }

    async fn fetch_profile(&self, merchant_id: &MerchantId) -> Result<Option<MerchantProfile>> {
        let query =
            format!("SELECT {MERCHANT_COLUMNS} FROM merchants FINAL WHERE merchant_id = ?");
        let rows = self
            .client
            .query(&query)
            .bind(merchant_id.as_str())
            .fetch_all::<MerchantRow>()
            .await?;
        Ok(rows.into_iter().next().map(MerchantProfile::from))
    }

    async fn upsert_merchants(&self, merchants: &[MerchantProfile]) -> Result<()> {
        let mut insert = self.client.insert("merchants")?;
        for merchant in merchants {
            insert.write(&MerchantRow::from(merchant)).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn update_risk_score(
        &self,
        merchant_id: &MerchantId,
        score: f64,
        computed_at: DateTime<Utc>,
    ) -> Result<()> {
        // New row version; the ReplacingMergeTree keeps the latest
        // risk_computed_at per merchant.
        let Some(mut profile) = self.fetch_profile(merchant_id).await? else {
            anyhow::bail!("merchant {} not found", merchant_id);
        };
        profile.risk_score = score;
        profile.risk_computed_at = Some(computed_at);
        self.upsert_merchants(std::slice::from_ref(&profile)).await
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for ClickhouseStore {
    async fn insert_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let mut insert = self.client.insert("transactions")?;
        for transaction in transactions {
            insert.write(&TransactionRow::from(transaction)).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn fetch_history(
        &self,
        merchant_id: &MerchantId,
        range: &DateRange,
    ) -> Result<Vec<Transaction>> {
        let mut query =
            format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE merchant_id = ?");
        if let Some(start) = range.start {
            query.push_str(&format!(
                " AND timestamp >= fromUnixTimestamp64Milli({})",
                start.timestamp_millis()
            ));
        }
        if let Some(end) = range.end {
            query.push_str(&format!(
                " AND timestamp <= fromUnixTimestamp64Milli({})",
                end.timestamp_millis()
            ));
        }
        query.push_str(" ORDER BY timestamp ASC");
        let rows = self
            .client
            .query(&query)
            .bind(merchant_id.as_str())
            .fetch_all::<TransactionRow>()
            .await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }
}
