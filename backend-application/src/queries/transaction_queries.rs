use std::collections::HashSet;

use backend_domain::{DateRange, HistoryQuery, MerchantId, Transaction, TransactionSummary};

use crate::{AppError, AppState};

const DEFAULT_LIMIT: usize = 100;

/// Transaction history, newest first, optionally bounded by inclusive
/// dates.
pub async fn history(
    state: &AppState,
    merchant_id: &MerchantId,
    query: HistoryQuery,
) -> Result<Vec<Transaction>, AppError> {
    ensure_merchant(state, merchant_id).await?;
    let range = DateRange {
        start: query.start,
        end: query.end,
    };
    let mut transactions = state
        .transaction_repo
        .fetch_history(merchant_id, &range)
        .await?;
    transactions.sort_by_key(|tx| std::cmp::Reverse(tx.timestamp));
    transactions.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));
    Ok(transactions)
}

pub async fn summarize(
    state: &AppState,
    merchant_id: &MerchantId,
    range: DateRange,
) -> Result<TransactionSummary, AppError> {
    ensure_merchant(state, merchant_id).await?;
    let transactions = state
        .transaction_repo
        .fetch_history(merchant_id, &range)
        .await?;

    let total = transactions.len();
    let total_amount: f64 = transactions.iter().map(|tx| tx.amount).sum();
    let max_amount = transactions.iter().map(|tx| tx.amount).fold(0.0, f64::max);
    let successes = transactions
        .iter()
        .filter(|tx| tx.status == "success")
        .count();
    let customers: HashSet<&str> = transactions
        .iter()
        .map(|tx| tx.customer_id.as_str())
        .collect();

    Ok(TransactionSummary {
        merchant_id: merchant_id.to_string(),
        total_transactions: total,
        total_amount,
        average_amount: if total > 0 {
            total_amount / total as f64
        } else {
            0.0
        },
        max_amount,
        success_rate: if total > 0 {
            successes as f64 / total as f64 * 100.0
        } else {
            0.0
        },
        unique_customers: customers.len(),
    })
}

async fn ensure_merchant(state: &AppState, merchant_id: &MerchantId) -> Result<(), AppError> {
    state
        .merchant_repo
        .fetch_profile(merchant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("merchant {merchant_id}")))?;
    Ok(())
}
