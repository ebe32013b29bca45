// Pattern detectors
// Independent, order-insensitive checks over one transaction plus the
// merchant's immutable history snapshot. All thresholds come from
// configuration; detectors read no implicit state and never see each
// other's output.

pub mod concentration;
pub mod high_velocity;
pub mod large_amount;
pub mod late_night;
pub mod round_amount;

pub use concentration::ConcentrationDetector;
pub use high_velocity::HighVelocityDetector;
pub use large_amount::LargeAmountDetector;
pub use late_night::LateNightDetector;
pub use round_amount::RoundAmountDetector;

use crate::entities::{AnomalyFinding, DetectorConfig, MerchantProfile, Transaction};
use crate::services::velocity::VelocitySnapshot;
use crate::value_objects::PatternKind;

pub struct DetectionContext<'a> {
    pub transaction: &'a Transaction,
    pub history: &'a [Transaction],
    pub profile: &'a MerchantProfile,
    pub velocity: &'a VelocitySnapshot<'a>,
    pub config: &'a DetectorConfig,
}

pub trait PatternDetector: Send + Sync {
    fn kind(&self) -> PatternKind;
    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding>;
}

pub struct DetectorSet {
    detectors: Vec<Box<dyn PatternDetector>>,
}

impl DetectorSet {
    pub fn detect_all(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding> {
        self.detectors
            .iter()
            .flat_map(|detector| detector.detect(ctx))
            .collect()
    }
}

impl Default for DetectorSet {
    fn default() -> Self {
        Self {
            detectors: vec![
                Box::new(LateNightDetector),
                Box::new(HighVelocityDetector),
                Box::new(RoundAmountDetector),
                Box::new(ConcentrationDetector),
                Box::new(LargeAmountDetector),
            ],
        }
    }
}

pub(crate) fn finding(
    ctx: &DetectionContext<'_>,
    kind: PatternKind,
    severity: crate::value_objects::Severity,
    reason: String,
) -> AnomalyFinding {
    AnomalyFinding {
        merchant_id: ctx.transaction.merchant_id.clone(),
        pattern: kind,
        severity,
        reason,
        transaction_ids: vec![ctx.transaction.transaction_id.clone()],
        observed_at: ctx.transaction.timestamp,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::entities::{MerchantProfile, Transaction};

    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    pub fn profile() -> MerchantProfile {
        MerchantProfile {
            merchant_id: "M1".to_string(),
            business_name: "Corner Books".to_string(),
            business_type: "retail".to_string(),
            registration_date: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            registered: true,
            avg_transaction_amount: 50.0,
            avg_hourly_transactions: 5.0,
            risk_score: 0.0,
            risk_computed_at: None,
        }
    }

    pub fn tx(id: &str, minute_offset: i64, amount: f64, customer: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            merchant_id: "M1".to_string(),
            timestamp: base_time() + Duration::minutes(minute_offset),
            amount,
            customer_id: customer.to_string(),
            device_id: "D1".to_string(),
            location: "Pune".to_string(),
            payment_method: "card".to_string(),
            status: "success".to_string(),
            category: "retail".to_string(),
            platform: "web".to_string(),
        }
    }
}
