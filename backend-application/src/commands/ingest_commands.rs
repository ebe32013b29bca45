use std::collections::HashMap;

use tracing::warn;

use backend_domain::{
    AnomalyFinding, DateRange, MerchantId, MerchantProfile, Severity, Transaction,
};

use crate::{AppError, AppState};

/// Stores an already-validated transaction batch and assesses each
/// transaction in real time against its merchant's history. Returns the
/// findings; persistence of the batch failing is fatal, a failed alert
/// delivery is not.
pub async fn process_transactions(
    state: &AppState,
    transactions: Vec<Transaction>,
) -> Result<Vec<AnomalyFinding>, AppError> {
    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_merchant: HashMap<String, Vec<Transaction>> = HashMap::new();
    for tx in &transactions {
        by_merchant
            .entry(tx.merchant_id.clone())
            .or_default()
            .push(tx.clone());
    }

    // Resolve every merchant before anything is stored; an unknown id
    // must reject the whole batch, not leave part of it behind.
    let mut profiles: HashMap<String, MerchantProfile> = HashMap::new();
    for merchant_id in by_merchant.keys() {
        let id = MerchantId(merchant_id.clone());
        let profile = state
            .merchant_repo
            .fetch_profile(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("merchant {merchant_id}")))?;
        profiles.insert(merchant_id.clone(), profile);
    }

    if let Err(err) = state.transaction_repo.insert_transactions(&transactions).await {
        state.metrics.record_ingest_error();
        return Err(AppError::Internal(err));
    }

    let mut findings = Vec::new();
    for (merchant_id, batch) in &by_merchant {
        let id = MerchantId(merchant_id.clone());
        let profile = &profiles[merchant_id];
        // History now includes the batch just stored.
        let history = state
            .transaction_repo
            .fetch_history(&id, &DateRange::unbounded())
            .await?;
        for tx in batch {
            let mut assessed = state
                .engine
                .assess_transaction(profile, &history, tx, &state.config.detector)
                .map_err(|err| AppError::BadRequest(err.to_string()))?;
            findings.append(&mut assessed);
        }
    }

    state.metrics.record_ingest(transactions.len());
    state.metrics.record_findings(findings.len());

    let critical: Vec<_> = findings
        .iter()
        .filter(|finding| finding.severity == Severity::CRITICAL)
        .cloned()
        .collect();
    if !critical.is_empty() {
        warn!("{} critical findings in ingest batch", critical.len());
        state
            .alert_service
            .spawn_alerts(state.config.clone(), critical);
    }

    Ok(findings)
}
