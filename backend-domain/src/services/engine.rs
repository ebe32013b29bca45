// Scoring engine entry points
// Runs the detector set over an immutable history snapshot and reduces
// the findings through the scorer. Everything the engine needs arrives
// as explicit input; there is no process-wide state.

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};

use crate::entities::{
    AnomalyFinding, DetectorConfig, Fingerprint, MerchantProfile, PatternWeights, RiskProfile,
    ScoringConfig, Transaction,
};
use crate::services::detectors::{DetectionContext, DetectorSet};
use crate::services::scorer::RiskScorer;
use crate::services::velocity::VelocitySnapshot;

pub struct ScoringEngine {
    detectors: DetectorSet,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            detectors: DetectorSet::default(),
        }
    }
}

impl ScoringEngine {
    /// Scores one merchant against its full history. Fails on corrupt
    /// history rather than producing a silently wrong number.
    pub fn evaluate(
        &self,
        profile: &MerchantProfile,
        history: &[Transaction],
        as_of: DateTime<Utc>,
        detector_config: &DetectorConfig,
        weights: &PatternWeights,
        scoring: &ScoringConfig,
        fingerprint: Fingerprint,
    ) -> Result<RiskProfile> {
        if history.is_empty() {
            bail!("empty history for merchant {}", profile.merchant_id);
        }
        validate_history(history)?;

        let snapshot = VelocitySnapshot::new(history);
        let window_start = as_of - Duration::days(scoring.scoring_window_days);
        let mut findings: Vec<AnomalyFinding> = Vec::new();
        for transaction in history {
            if transaction.timestamp < window_start || transaction.timestamp > as_of {
                continue;
            }
            let ctx = DetectionContext {
                transaction,
                history,
                profile,
                velocity: &snapshot,
                config: detector_config,
            };
            findings.extend(self.detectors.detect_all(&ctx));
        }

        let scorer = RiskScorer::new(weights, scoring);
        Ok(scorer.score(&profile.merchant_id, findings, as_of, fingerprint))
    }

    /// Real-time assessment of a single transaction against the
    /// merchant's history (which may or may not already contain it).
    pub fn assess_transaction(
        &self,
        profile: &MerchantProfile,
        history: &[Transaction],
        transaction: &Transaction,
        detector_config: &DetectorConfig,
    ) -> Result<Vec<AnomalyFinding>> {
        validate_transaction(transaction)?;
        let snapshot = VelocitySnapshot::new(history);
        let ctx = DetectionContext {
            transaction,
            history,
            profile,
            velocity: &snapshot,
            config: detector_config,
        };
        Ok(self.detectors.detect_all(&ctx))
    }
}

fn validate_history(history: &[Transaction]) -> Result<()> {
    for transaction in history {
        validate_transaction(transaction)?;
    }
    Ok(())
}

fn validate_transaction(transaction: &Transaction) -> Result<()> {
    if !transaction.amount.is_finite() || transaction.amount < 0.0 {
        bail!(
            "corrupt amount {} on transaction {}",
            transaction.amount,
            transaction.transaction_id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detectors::test_support::{base_time, profile, tx};
    use crate::value_objects::PatternKind;
    use chrono::{TimeZone, Utc};

    fn evaluate(history: &[Transaction]) -> Result<RiskProfile> {
        ScoringEngine::default().evaluate(
            &profile(),
            history,
            base_time() + Duration::hours(1),
            &DetectorConfig::default(),
            &PatternWeights::default(),
            &ScoringConfig::default(),
            Fingerprint("fp".to_string()),
        )
    }

    fn daytime_history() -> Vec<Transaction> {
        // ten $50 transactions spread over daytime hours (06:00-12:00)
        (0..10)
            .map(|i| tx(&format!("day{i}"), -(i as i64) * 40, 50.0, &format!("c{i}")))
            .collect()
    }

    #[test]
    fn quiet_merchant_scores_zero() {
        let profile = evaluate(&daytime_history()).unwrap();
        assert_eq!(profile.score, 0.0);
        assert!(profile.findings.is_empty());
    }

    #[test]
    fn late_night_large_transaction_raises_both_patterns() {
        let mut history = daytime_history();
        let mut night = tx("night", 0, 5000.0, "c9");
        night.timestamp = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();
        history.push(night);

        let profile = evaluate(&history).unwrap();
        assert!(profile.score > 0.0);
        let patterns: Vec<PatternKind> =
            profile.findings.iter().map(|f| f.pattern).collect();
        assert!(patterns.contains(&PatternKind::LateNight));
        assert!(patterns.contains(&PatternKind::LargeAmount));
        assert!(profile.breakdown[&PatternKind::LateNight] > 0.0);
        assert!(profile.breakdown[&PatternKind::LargeAmount] > 0.0);
    }

    #[test]
    fn appending_anomalies_never_lowers_the_score() {
        let mut history = daytime_history();
        let base = evaluate(&history).unwrap();
        let mut last = base.score;
        for i in 0..5 {
            let mut night = tx(&format!("big{i}"), 0, 12_000.0, "c0");
            night.timestamp = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap()
                - Duration::days(i as i64);
            history.push(night);
            let profile = evaluate(&history).unwrap();
            assert!(profile.score >= last);
            last = profile.score;
        }
    }

    #[test]
    fn empty_history_is_an_input_error() {
        assert!(evaluate(&[]).is_err());
    }

    #[test]
    fn corrupt_amount_fails_the_computation() {
        let mut history = daytime_history();
        history.push(tx("bad", 0, f64::NAN, "c0"));
        assert!(evaluate(&history).is_err());
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let history = {
            let mut h = daytime_history();
            let mut night = tx("night", 0, 5000.0, "c9");
            night.timestamp = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();
            h.push(night);
            h
        };
        let a = evaluate(&history).unwrap();
        let b = evaluate(&history).unwrap();
        assert_eq!(a.score, b.score);
        assert_eq!(a.breakdown, b.breakdown);
        assert_eq!(a.findings.len(), b.findings.len());
    }
}
