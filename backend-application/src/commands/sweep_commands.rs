// Batch orchestrator
// Fans scoring out across the merchant population through the result
// cache with a bounded worker pool. One merchant failing is recorded
// and skipped, never fatal to the batch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};

use backend_domain::{
    current_millis, MerchantId, MerchantRiskSummary, PatternKind, RiskProfile, ScoreDistribution,
    SweepError, SweepReport,
};

use crate::commands::score_commands;
use crate::{AppError, AppState};

pub async fn run_sweep(
    state: &AppState,
    as_of: DateTime<Utc>,
    cancel: Arc<AtomicBool>,
) -> Result<SweepReport, AppError> {
    // Claim the running flag under the write lock so two concurrent
    // sweep requests cannot both pass the guard.
    {
        let mut status = state.sweep_status.write().await;
        if status.running {
            return Err(AppError::BadRequest("sweep already running".to_string()));
        }
        status.running = true;
        status.total = 0;
        status.done = 0;
        status.updated_at = current_millis();
    }

    state.metrics.record_sweep_run();
    let started_at = Utc::now();
    let merchants = match state.merchant_repo.list_merchants().await {
        Ok(merchants) => merchants,
        Err(err) => {
            let mut status = state.sweep_status.write().await;
            status.running = false;
            status.updated_at = current_millis();
            return Err(AppError::Internal(err));
        }
    };
    let total = merchants.len();

    {
        let mut status = state.sweep_status.write().await;
        status.total = total as u32;
        status.updated_at = current_millis();
    }

    let semaphore = Arc::new(Semaphore::new(state.config.worker_pool_size.max(1)));
    let deadline =
        Instant::now() + std::time::Duration::from_secs(state.config.batch_timeout_seconds.max(1));
    let mut join_set: JoinSet<(String, Result<RiskProfile, AppError>)> = JoinSet::new();
    let mut cancelled = false;
    let mut skipped: Vec<String> = Vec::new();

    for merchant in &merchants {
        // Cooperative cancellation between merchants; in-flight work
        // publishes only completed results, so nothing half-computed is
        // ever cached.
        if cancel.load(Ordering::Relaxed) || Instant::now() >= deadline {
            cancelled = true;
            skipped.push(merchant.merchant_id.clone());
            continue;
        }
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let task_state = state.clone();
        let merchant_id = merchant.merchant_id.clone();
        join_set.spawn(async move {
            let _permit = permit;
            let id = MerchantId(merchant_id.clone());
            let outcome = score_commands::score_merchant(&task_state, &id, as_of).await;
            (merchant_id, outcome)
        });
    }

    let mut results: Vec<MerchantRiskSummary> = Vec::new();
    let mut errors: Vec<SweepError> = Vec::new();
    let mut pattern_totals: HashMap<PatternKind, u64> = HashMap::new();
    let mut distribution = ScoreDistribution::default();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_merchant_id, Ok(profile))) => {
                distribution.record(profile.score);
                for finding in &profile.findings {
                    *pattern_totals.entry(finding.pattern).or_insert(0) += 1;
                }
                results.push(summarize(&profile));
            }
            Ok((merchant_id, Err(err))) => {
                warn!("sweep: merchant {} failed: {}", merchant_id, err);
                state.metrics.record_sweep_merchant_error();
                errors.push(SweepError {
                    merchant_id,
                    reason: err.to_string(),
                });
            }
            Err(join_err) => {
                warn!("sweep: worker task failed: {}", join_err);
                errors.push(SweepError {
                    merchant_id: "unknown".to_string(),
                    reason: join_err.to_string(),
                });
            }
        }
        let mut status = state.sweep_status.write().await;
        status.done += 1;
        status.updated_at = current_millis();
    }

    for merchant_id in skipped {
        errors.push(SweepError {
            merchant_id,
            reason: "cancelled before start".to_string(),
        });
    }

    {
        let mut status = state.sweep_status.write().await;
        status.running = false;
        status.updated_at = current_millis();
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let merchants_scored = results.len();
    info!(
        "sweep finished: {} of {} merchants scored, {} errors",
        merchants_scored,
        total,
        errors.len()
    );

    Ok(SweepReport {
        started_at,
        finished_at: Utc::now(),
        merchants_total: total,
        merchants_scored,
        pattern_totals,
        distribution,
        results,
        errors,
        cancelled,
    })
}

fn summarize(profile: &RiskProfile) -> MerchantRiskSummary {
    let top_pattern = profile
        .breakdown
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(kind, _)| *kind);
    MerchantRiskSummary {
        merchant_id: profile.merchant_id.clone(),
        score: profile.score,
        finding_count: profile.findings.len(),
        top_pattern,
    }
}
