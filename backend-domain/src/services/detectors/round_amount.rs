// Round-amount detector
// A single round amount is ordinary; a habit of them is not. Flags only
// when the current amount is an exact multiple of the round unit AND
// round amounts exceed the configured share of the trailing window.

use chrono::Duration;

use crate::entities::AnomalyFinding;
use crate::services::detectors::{finding, DetectionContext, PatternDetector};
use crate::value_objects::{PatternKind, Severity};

pub struct RoundAmountDetector;

/// Minimum window population before a share is meaningful.
const MIN_SAMPLES: usize = 3;

/// Exact-multiple check through integer cents; f64 modulus drifts.
pub(crate) fn is_round_multiple(amount: f64, unit: f64) -> bool {
    if !(amount.is_finite() && unit.is_finite()) || amount <= 0.0 || unit <= 0.0 {
        return false;
    }
    let cents = (amount * 100.0).round() as i64;
    let unit_cents = (unit * 100.0).round() as i64;
    unit_cents > 0 && cents % unit_cents == 0
}

impl PatternDetector for RoundAmountDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::RoundAmount
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding> {
        let config = ctx.config;
        if !is_round_multiple(ctx.transaction.amount, config.round_unit) {
            return Vec::new();
        }

        let window = Duration::hours(config.round_window_hours as i64);
        let recent = ctx.velocity.window(ctx.transaction.timestamp, window);
        if recent.len() < MIN_SAMPLES {
            return Vec::new();
        }
        let round_count = recent
            .iter()
            .filter(|tx| is_round_multiple(tx.amount, config.round_unit))
            .count();
        let share = round_count as f64 / recent.len() as f64;
        if share <= config.round_frequency_threshold {
            return Vec::new();
        }

        let severity = if share > 0.75 {
            Severity::HIGH
        } else {
            Severity::MEDIUM
        };
        let reason = format!(
            "{} of {} trailing transactions are multiples of {:.0} (share {:.2} over threshold {:.2})",
            round_count, recent.len(), config.round_unit, share, config.round_frequency_threshold
        );
        vec![finding(ctx, PatternKind::RoundAmount, severity, reason)]
    }
}
