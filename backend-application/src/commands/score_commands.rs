use chrono::{DateTime, Utc};
use tracing::warn;

use backend_domain::{DateRange, MerchantId, RiskProfile, Severity};

use crate::cache::FingerprintStrategy;
use crate::{AppError, AppState};

/// score-one-merchant: fetch profile and history, then compute through
/// the result cache. A stale or missing cache entry triggers exactly
/// one computation; concurrent callers share it.
pub async fn score_merchant(
    state: &AppState,
    merchant_id: &MerchantId,
    as_of: DateTime<Utc>,
) -> Result<RiskProfile, AppError> {
    state.metrics.record_score_request();

    let profile = state
        .merchant_repo
        .fetch_profile(merchant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("merchant {merchant_id}")))?;
    let history = state
        .transaction_repo
        .fetch_history(merchant_id, &DateRange::unbounded())
        .await?;
    if history.is_empty() {
        return Err(AppError::BadRequest(format!(
            "no transactions for merchant {merchant_id}"
        )));
    }

    let strategy = FingerprintStrategy::parse(&state.config.fingerprint_strategy)
        .unwrap_or(FingerprintStrategy::CountLatest);
    let fingerprint = strategy.fingerprint(&history);
    let weights = { state.weights.read().await.clone() };

    let engine = state.engine.clone();
    let detector = state.config.detector.clone();
    let scoring = state.config.scoring.clone();
    let fp = fingerprint.clone();
    let (risk, computed) = state
        .cache
        .get_or_compute(merchant_id, fingerprint, move || async move {
            engine.evaluate(&profile, &history, as_of, &detector, &weights, &scoring, fp)
        })
        .await
        .map_err(|err| AppError::Computation(err.to_string()))?;

    if computed {
        state.metrics.record_cache_miss();
        state.metrics.record_findings(risk.findings.len());
        if let Err(err) = state
            .merchant_repo
            .update_risk_score(merchant_id, risk.score, risk.computed_at)
            .await
        {
            warn!("failed to write back risk score for {}: {}", merchant_id, err);
        }
        let critical: Vec<_> = risk
            .findings
            .iter()
            .filter(|finding| finding.severity == Severity::CRITICAL)
            .cloned()
            .collect();
        if !critical.is_empty() {
            state
                .alert_service
                .spawn_alerts(state.config.clone(), critical);
        }
    } else {
        state.metrics.record_cache_hit();
    }

    Ok(risk)
}
