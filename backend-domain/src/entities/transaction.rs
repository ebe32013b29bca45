// Transaction entity
// Immutable once created; read-only input to the scoring engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub merchant_id: String,
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub customer_id: String,
    pub device_id: String,
    pub location: String,
    pub payment_method: String,
    pub status: String,
    pub category: String,
    pub platform: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestEnvelope {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}
