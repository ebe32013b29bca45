use tracing::error;

use backend_domain::{PatternKind, PatternWeights};

use crate::{AppError, AppState};

/// Replaces the active pattern weights and persists them. Cached
/// profiles were computed under the old weights, so the cache drops.
pub async fn update_pattern_weights(
    state: &AppState,
    weights: PatternWeights,
) -> Result<(), AppError> {
    for kind in PatternKind::ALL {
        let value = weights.weight(kind);
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::BadRequest(format!(
                "invalid weight for {kind}: {value}"
            )));
        }
    }

    state
        .config_repo
        .save_pattern_weights(&state.config.weights_path, &weights)
        .await
        .map_err(|err| {
            error!("failed to persist pattern weights: {}", err);
            AppError::Internal(err)
        })?;

    *state.weights.write().await = weights;
    state.cache.clear().await;
    Ok(())
}
