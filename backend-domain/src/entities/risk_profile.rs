// Risk profile entity
// The cached, aggregated scoring result for one merchant

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::AnomalyFinding;
use crate::value_objects::PatternKind;

/// Cheap summary of a merchant's current transaction set. A cached
/// profile is valid only while its fingerprint matches the one derived
/// from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    pub merchant_id: String,
    /// Aggregate score, always inside [0, 100].
    pub score: f64,
    pub breakdown: HashMap<PatternKind, f64>,
    pub findings: Vec<AnomalyFinding>,
    pub computed_at: DateTime<Utc>,
    pub fingerprint: Fingerprint,
}
