// Runtime configuration shared across layers

use serde::{Deserialize, Serialize};

use crate::value_objects::PatternKind;

/// Thresholds consumed by the pattern detectors. External configuration,
/// validated at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Nocturnal window, inclusive on both ends, wrapping midnight.
    pub nocturnal_start_hour: u32,
    pub nocturnal_end_hour: u32,
    /// Trailing window for rate-based detection, in minutes.
    pub velocity_window_minutes: u64,
    /// Spike threshold: trailing count or sum strictly above
    /// `spike_multiplier` times the merchant baseline flags.
    pub spike_multiplier: f64,
    pub round_unit: f64,
    pub round_frequency_threshold: f64,
    pub round_window_hours: u64,
    pub concentration_threshold: f64,
    pub concentration_window_hours: u64,
    pub large_amount_ceiling: f64,
    pub large_amount_multiplier: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            nocturnal_start_hour: 23,
            nocturnal_end_hour: 4,
            velocity_window_minutes: 60,
            spike_multiplier: 3.0,
            round_unit: 100.0,
            round_frequency_threshold: 0.4,
            round_window_hours: 24,
            concentration_threshold: 0.4,
            concentration_window_hours: 24,
            large_amount_ceiling: 5000.0,
            large_amount_multiplier: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Findings older than this many days before `as_of` do not score.
    pub scoring_window_days: i64,
    /// Findings of the same kind within one span collapse to a single
    /// contribution.
    pub dedup_window_minutes: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scoring_window_days: 30,
            dedup_window_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternWeights {
    pub late_night: f64,
    pub high_velocity: f64,
    pub round_amount: f64,
    pub customer_concentration: f64,
    pub large_amount: f64,
}

impl PatternWeights {
    pub fn weight(&self, kind: PatternKind) -> f64 {
        match kind {
            PatternKind::LateNight => self.late_night,
            PatternKind::HighVelocity => self.high_velocity,
            PatternKind::RoundAmount => self.round_amount,
            PatternKind::CustomerConcentration => self.customer_concentration,
            PatternKind::LargeAmount => self.large_amount,
        }
    }
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            late_night: 15.0,
            high_velocity: 25.0,
            round_amount: 15.0,
            customer_concentration: 20.0,
            large_amount: 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub storage_backend: String,
    pub report_dir: String,
    pub public_base_url: String,
    pub webhook_url: Option<String>,
    pub alert_webhook_url: Option<String>,
    pub alert_webhook_token: Option<String>,
    pub weights_path: String,
    pub fingerprint_strategy: String,
    pub cache_capacity: usize,
    pub worker_pool_size: usize,
    pub batch_timeout_seconds: u64,
    pub sweep_hour: u32,
    pub sweep_minute: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub detector: DetectorConfig,
    pub scoring: ScoringConfig,
    pub weights: PatternWeights,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
