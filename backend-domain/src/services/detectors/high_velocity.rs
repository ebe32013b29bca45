// High-velocity detector
// Flags when the trailing-window count or sum runs strictly above the
// spike multiplier times the merchant's baseline rate. Exactly the
// multiplier does not trigger.

use chrono::Duration;

use crate::entities::AnomalyFinding;
use crate::services::detectors::{finding, DetectionContext, PatternDetector};
use crate::value_objects::{PatternKind, Severity};

pub struct HighVelocityDetector;

impl PatternDetector for HighVelocityDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::HighVelocity
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding> {
        let config = ctx.config;
        let window = Duration::minutes(config.velocity_window_minutes as i64);
        let baseline_count =
            ctx.profile.avg_hourly_transactions * config.velocity_window_minutes as f64 / 60.0;
        if baseline_count <= 0.0 {
            return Vec::new();
        }

        let stats = ctx.velocity.stats(ctx.transaction.timestamp, window);
        let count_limit = config.spike_multiplier * baseline_count;
        let baseline_sum = baseline_count * ctx.profile.avg_transaction_amount;
        let sum_limit = config.spike_multiplier * baseline_sum;

        let count_spike = (stats.count as f64) > count_limit;
        let sum_spike = baseline_sum > 0.0 && stats.sum > sum_limit;
        if !count_spike && !sum_spike {
            return Vec::new();
        }

        let ratio = if count_spike {
            stats.count as f64 / baseline_count
        } else {
            stats.sum / baseline_sum
        };
        let severity = if ratio > 2.0 * config.spike_multiplier {
            Severity::HIGH
        } else {
            Severity::MEDIUM
        };
        let reason = format!(
            "{} transactions totalling {:.2} in trailing {}m against baseline {:.1}/window ({}x threshold {:.1})",
            stats.count,
            stats.sum,
            config.velocity_window_minutes,
            baseline_count,
            config.spike_multiplier,
            count_limit,
        );
        vec![finding(ctx, PatternKind::HighVelocity, severity, reason)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DetectorConfig, Transaction};
    use crate::services::detectors::test_support::{profile, tx};
    use crate::services::velocity::VelocitySnapshot;

    fn burst(count: usize) -> Vec<Transaction> {
        (0..count)
            .map(|i| tx(&format!("t{i}"), -(i as i64), 10.0, "C1"))
            .collect()
    }

    fn detect(history: &[Transaction]) -> Vec<AnomalyFinding> {
        let snapshot = VelocitySnapshot::new(history);
        let config = DetectorConfig::default();
        let profile = profile();
        let last = &history[0];
        let ctx = DetectionContext {
            transaction: last,
            history,
            profile: &profile,
            velocity: &snapshot,
            config: &config,
        };
        HighVelocityDetector.detect(&ctx)
    }

    #[test]
    fn fifty_per_hour_against_five_baseline_triggers() {
        let history = burst(50);
        let findings = detect(&history);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::HIGH);
    }

    #[test]
    fn exactly_three_times_baseline_does_not_trigger() {
        // 15 == 3.0 x 5/h: the boundary itself stays quiet. The sum is
        // 150.0 against a 750.0 sum limit, so no sum spike either.
        let history = burst(15);
        assert!(detect(&history).is_empty());
    }

    #[test]
    fn sixteen_trips_the_count_boundary() {
        let history = burst(16);
        assert_eq!(detect(&history).len(), 1);
    }
}
