// Late-night detector
// Flags transactions inside the configured nocturnal window. Severity
// rises with depth into the window and with amount against the
// merchant's average.

use chrono::Timelike;

use crate::entities::AnomalyFinding;
use crate::services::detectors::{finding, DetectionContext, PatternDetector};
use crate::value_objects::{PatternKind, Severity};

pub struct LateNightDetector;

fn in_nocturnal_window(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        hour >= start && hour <= end
    } else {
        hour >= start || hour <= end
    }
}

/// Hours elapsed since the window opened, accounting for the midnight
/// wrap.
fn depth_hours(hour: u32, start: u32) -> u32 {
    if hour >= start {
        hour - start
    } else {
        hour + 24 - start
    }
}

fn window_len(start: u32, end: u32) -> u32 {
    (end + 24 - start) % 24 + 1
}

impl PatternDetector for LateNightDetector {
    fn kind(&self) -> PatternKind {
        PatternKind::LateNight
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Vec<AnomalyFinding> {
        let config = ctx.config;
        let hour = ctx.transaction.timestamp.hour();
        if !in_nocturnal_window(hour, config.nocturnal_start_hour, config.nocturnal_end_hour) {
            return Vec::new();
        }

        let depth = depth_hours(hour, config.nocturnal_start_hour);
        let len = window_len(config.nocturnal_start_hour, config.nocturnal_end_hour);
        let deep = depth * 2 >= len;
        let avg = ctx.profile.avg_transaction_amount;
        let oversized = avg > 0.0 && ctx.transaction.amount > 2.0 * avg;

        let severity = match (deep, oversized) {
            (true, true) => Severity::HIGH,
            (false, true) | (true, false) => Severity::MEDIUM,
            (false, false) => Severity::LOW,
        };
        let reason = format!(
            "transaction at {:02}:00 inside nocturnal window {:02}:00-{:02}:00, amount {:.2}",
            hour, config.nocturnal_start_hour, config.nocturnal_end_hour, ctx.transaction.amount
        );
        vec![finding(ctx, PatternKind::LateNight, severity, reason)]
    }
}
