// Customer-concentration detector
// Flags when one customer carries a disproportionate share of the
// trailing window, by count or by volume. Fires on the concentrated
// customer's own transactions so dedup can collapse the burst.

use std::collections::HashMap;

use chrono::Duration;

use crate::entities::AnomalyFinding;
use crate::services::detectors::{finding, DetectionContext, PatternDetector};
use crate::value_objects::{PatternKind, Severity};

pub struct ConcentrationDetector;

const MIN_SAMPLES: usize = 3;

impl PatternDetector for ConcentrationDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::CustomerConcentration
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding> {
        let config = ctx.config;
        let window = Duration::hours(config.concentration_window_hours as i64);
        let recent = ctx.velocity.window(ctx.transaction.timestamp, window);
        if recent.len() < MIN_SAMPLES {
            return Vec::new();
        }

        let mut counts: HashMap<&str, (usize, f64)> = HashMap::new();
        let mut total_sum = 0.0;
        for tx in recent {
            let entry = counts.entry(tx.customer_id.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += tx.amount;
            total_sum += tx.amount;
        }

        let customer = ctx.transaction.customer_id.as_str();
        let Some(&(count, sum)) = counts.get(customer) else {
            return Vec::new();
        };
        let count_share = count as f64 / recent.len() as f64;
        let sum_share = if total_sum > 0.0 { sum / total_sum } else { 0.0 };
        let share = count_share.max(sum_share);
        if share <= config.concentration_threshold {
            return Vec::new();
        }

        let severity = if share > 0.75 {
            Severity::HIGH
        } else {
            Severity::MEDIUM
        };
        let reason = format!(
            "customer {} holds {:.2} of trailing {}h activity ({} of {} transactions, {:.2} of volume)",
            customer,
            share,
            config.concentration_window_hours,
            count,
            recent.len(),
            sum_share,
        );
        vec![finding(ctx, PatternKind::CustomerConcentration, severity, reason)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DetectorConfig, Transaction};
    use crate::services::detectors::test_support::{profile, tx};
    use crate::services::velocity::VelocitySnapshot;

    fn detect(history: &[Transaction]) -> Vec<AnomalyFinding> {
        let snapshot = VelocitySnapshot::new(history);
        let config = DetectorConfig::default();
        let profile = profile();
        let ctx = DetectionContext {
            transaction: &history[0],
            history,
            profile: &profile,
            velocity: &snapshot,
            config: &config,
        };
        ConcentrationDetector.detect(&ctx)
    }

    #[test]
    fn dominant_customer_flags() {
        let history = vec![
            tx("t0", 0, 50.0, "whale"),
            tx("t1", -10, 50.0, "whale"),
            tx("t2", -20, 50.0, "whale"),
            tx("t3", -30, 50.0, "other"),
        ];
        let findings = detect(&history);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::MEDIUM);
    }

    #[test]
    fn spread_customers_stay_quiet() {
        let history = vec![
            tx("t0", 0, 50.0, "a"),
            tx("t1", -10, 50.0, "b"),
            tx("t2", -20, 50.0, "c"),
            tx("t3", -30, 50.0, "d"),
        ];
        assert!(detect(&history).is_empty());
    }

    #[test]
    fn only_the_concentrated_customers_transactions_fire() {
        let history = vec![
            tx("t0", 0, 10.0, "minnow"),
            tx("t1", -10, 50.0, "whale"),
            tx("t2", -20, 50.0, "whale"),
            tx("t3", -30, 50.0, "whale"),
        ];
        // current transaction belongs to the minnow: count share 0.25,
        // volume share 10/160
        assert!(detect(&history).is_empty());
    }

    #[test]
    fn share_exactly_at_threshold_does_not_flag() {
        let history = vec![
            tx("t0", 0, 50.0, "whale"),
            tx("t1", -10, 50.0, "whale"),
            tx("t2", -20, 50.0, "a"),
            tx("t3", -30, 50.0, "b"),
            tx("t4", -40, 50.0, "c"),
        ];
        // 2 of 5 = 0.4 by count and by volume, not strictly above 0.4
        assert!(detect(&history).is_empty());
    }
}
