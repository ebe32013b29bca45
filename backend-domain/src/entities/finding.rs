// Anomaly finding entity
// A single detector's signal for one transaction or window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PatternKind, Severity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub merchant_id: String,
    pub pattern: PatternKind,
    pub severity: Severity,
    pub reason: String,
    pub transaction_ids: Vec<String>,
    pub observed_at: DateTime<Utc>,
}
