// Large-amount detector
// Absolute ceiling plus a multiple of the merchant's own average.

use crate::entities::AnomalyFinding;
use crate::services::detectors::{finding, DetectionContext, PatternDetector};
use crate::value_objects::{PatternKind, Severity};

pub struct LargeAmountDetector;

impl PatternDetector for LargeAmountDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::LargeAmount
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding> {
        let config = ctx.config;
        let amount = ctx.transaction.amount;
        let avg = ctx.profile.avg_transaction_amount;

        let over_ceiling = amount > config.large_amount_ceiling;
        let over_multiple = avg > 0.0 && amount > config.large_amount_multiplier * avg;
        if !over_ceiling && !over_multiple {
            return Vec::new();
        }

        let severity = if over_ceiling && over_multiple {
            Severity::CRITICAL
        } else if over_ceiling {
            Severity::HIGH
        } else {
            Severity::MEDIUM
        };
        let reason = format!(
            "amount {:.2} against ceiling {:.2} and merchant average {:.2} (x{:.1} limit)",
            amount, config.large_amount_ceiling, avg, config.large_amount_multiplier
        );
        vec![finding(ctx, PatternKind::LargeAmount, severity, reason)]
    }
}
