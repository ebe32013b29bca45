// Query parameter and summary types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date bounds; an absent bound means unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if ts > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskQuery {
    /// Reference time for windowing; defaults to now.
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub merchant_id: String,
    pub total_transactions: usize,
    pub total_amount: f64,
    pub average_amount: f64,
    pub max_amount: f64,
    pub success_rate: f64,
    pub unique_customers: usize,
}
