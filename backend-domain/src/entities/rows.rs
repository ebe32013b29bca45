// ClickHouse row types mirroring the domain entities

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entities::{MerchantProfile, Transaction};
use crate::utils::{chrono_to_offset, offset_to_chrono};

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub merchant_id: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub timestamp: OffsetDateTime,
    pub amount: f64,
    pub customer_id: String,
    pub device_id: String,
    pub location: String,
    pub payment_method: String,
    pub status: String,
    pub category: String,
    pub platform: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            merchant_id: tx.merchant_id.clone(),
            timestamp: chrono_to_offset(tx.timestamp),
            amount: tx.amount,
            customer_id: tx.customer_id.clone(),
            device_id: tx.device_id.clone(),
            location: tx.location.clone(),
            payment_method: tx.payment_method.clone(),
            status: tx.status.clone(),
            category: tx.category.clone(),
            platform: tx.platform.clone(),
        }
    }
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            merchant_id: row.merchant_id,
            timestamp: offset_to_chrono(row.timestamp),
            amount: row.amount,
            customer_id: row.customer_id,
            device_id: row.device_id,
            location: row.location,
            payment_method: row.payment_method,
            status: row.status,
            category: row.category,
            platform: row.platform,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct MerchantRow {
    pub merchant_id: String,
    pub business_name: String,
    pub business_type: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub registration_date: OffsetDateTime,
    pub registered: bool,
    pub avg_transaction_amount: f64,
    pub avg_hourly_transactions: f64,
    pub risk_score: f64,
    /// Millis since epoch; 0 means never computed.
    pub risk_computed_at: i64,
}

impl From<&MerchantProfile> for MerchantRow {
    fn from(profile: &MerchantProfile) -> Self {
        Self {
            merchant_id: profile.merchant_id.clone(),
            business_name: profile.business_name.clone(),
            business_type: profile.business_type.clone(),
            registration_date: chrono_to_offset(profile.registration_date),
            registered: profile.registered,
            avg_transaction_amount: profile.avg_transaction_amount,
            avg_hourly_transactions: profile.avg_hourly_transactions,
            risk_score: profile.risk_score,
            risk_computed_at: profile
                .risk_computed_at
                .map(|ts| ts.timestamp_millis())
                .unwrap_or(0),
        }
    }
}

impl From<MerchantRow> for MerchantProfile {
    fn from(row: MerchantRow) -> Self {
        Self {
            merchant_id: row.merchant_id,
            business_name: row.business_name,
            business_type: row.business_type,
            registration_date: offset_to_chrono(row.registration_date),
            registered: row.registered,
            avg_transaction_amount: row.avg_transaction_amount,
            avg_hourly_transactions: row.avg_hourly_transactions,
            risk_score: row.risk_score,
            risk_computed_at: if row.risk_computed_at > 0 {
                chrono::DateTime::from_timestamp_millis(row.risk_computed_at)
            } else {
                None
            },
        }
    }
}
