// Sweep report entities

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::PatternKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantRiskSummary {
    pub merchant_id: String,
    pub score: f64,
    pub finding_count: usize,
    pub top_pattern: Option<PatternKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepError {
    pub merchant_id: String,
    pub reason: String,
}

/// Score histogram over the merchant population, bucketed by quartile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub low: u64,
    pub guarded: u64,
    pub elevated: u64,
    pub severe: u64,
}

impl ScoreDistribution {
    pub fn record(&mut self, score: f64) {
        if score < 25.0 {
            self.low += 1;
        } else if score < 50.0 {
            self.guarded += 1;
        } else if score < 75.0 {
            self.elevated += 1;
        } else {
            self.severe += 1;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub merchants_total: usize,
    pub merchants_scored: usize,
    pub pattern_totals: HashMap<PatternKind, u64>,
    pub distribution: ScoreDistribution,
    pub results: Vec<MerchantRiskSummary>,
    pub errors: Vec<SweepError>,
    pub cancelled: bool,
}

/// Progress of the in-flight sweep, published for the ops surface.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepStatus {
    pub running: bool,
    pub total: u32,
    pub done: u32,
    pub updated_at: i64,
}
