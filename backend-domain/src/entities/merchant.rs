// Merchant profile entity
// The engine reads the profile and writes back only the risk score

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub merchant_id: String,
    pub business_name: String,
    pub business_type: String,
    pub registration_date: DateTime<Utc>,
    pub registered: bool,
    /// Expected transaction amount, the large-amount baseline.
    pub avg_transaction_amount: f64,
    /// Expected transactions per hour, the velocity-spike reference.
    pub avg_hourly_transactions: f64,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub risk_computed_at: Option<DateTime<Utc>>,
}
