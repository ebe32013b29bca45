// Risk scorer
// Reduces a finding set to one weighted, clamped score plus a
// per-pattern breakdown. Deterministic: no randomness, no wall clock
// beyond the supplied as-of.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::entities::{AnomalyFinding, Fingerprint, PatternWeights, RiskProfile, ScoringConfig};
use crate::value_objects::PatternKind;

pub struct RiskScorer<'a> {
    weights: &'a PatternWeights,
    config: &'a ScoringConfig,
}

impl<'a> RiskScorer<'a> {
    pub fn new(weights: &'a PatternWeights, config: &'a ScoringConfig) -> Self {
        Self { weights, config }
    }

    pub fn score(
        &self,
        merchant_id: &str,
        findings: Vec<AnomalyFinding>,
        as_of: DateTime<Utc>,
        fingerprint: Fingerprint,
    ) -> RiskProfile {
        let window_start = as_of - Duration::days(self.config.scoring_window_days);
        let span_secs = (self.config.dedup_window_minutes.max(1)) * 60;

        // One contribution per (pattern, dedup span); a burst of
        // identical findings must not saturate the score. Ties keep the
        // earliest finding, so the result is order-independent.
        let mut sorted = findings;
        sorted.sort_by(|a, b| {
            (a.pattern.as_str(), a.observed_at, b.severity)
                .cmp(&(b.pattern.as_str(), b.observed_at, a.severity))
        });
        let mut deduped: HashMap<(PatternKind, i64), AnomalyFinding> = HashMap::new();
        for finding in sorted {
            if finding.observed_at < window_start || finding.observed_at > as_of {
                continue;
            }
            let bucket = finding.observed_at.timestamp().div_euclid(span_secs);
            let key = (finding.pattern, bucket);
            match deduped.get(&key) {
                Some(existing) if existing.severity >= finding.severity => {}
                _ => {
                    deduped.insert(key, finding);
                }
            }
        }
        let mut unique: Vec<AnomalyFinding> = deduped.into_values().collect();
        unique.sort_by(|a, b| {
            (a.observed_at, a.pattern.as_str()).cmp(&(b.observed_at, b.pattern.as_str()))
        });

        let mut breakdown: HashMap<PatternKind, f64> = HashMap::new();
        let mut total = 0.0;
        for finding in &unique {
            let contribution =
                self.weights.weight(finding.pattern) * finding.severity.multiplier();
            *breakdown.entry(finding.pattern).or_insert(0.0) += contribution;
            total += contribution;
        }

        RiskProfile {
            merchant_id: merchant_id.to_string(),
            score: total.clamp(0.0, 100.0),
            breakdown,
            findings: unique,
            computed_at: as_of,
            fingerprint,
        }
    }
}
