use tracing::error;

use backend_domain::{MerchantId, MerchantProfile};

use crate::{AppError, AppState};

pub async fn list_merchants(state: &AppState) -> Result<Vec<MerchantProfile>, AppError> {
    let mut merchants = state.merchant_repo.list_merchants().await.map_err(|err| {
        error!("failed to list merchants: {}", err);
        AppError::Internal(err)
    })?;
    merchants.sort_by(|a, b| a.merchant_id.cmp(&b.merchant_id));
    Ok(merchants)
}

pub async fn get_merchant(
    state: &AppState,
    merchant_id: &MerchantId,
) -> Result<MerchantProfile, AppError> {
    state
        .merchant_repo
        .fetch_profile(merchant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("merchant {merchant_id}")))
}
