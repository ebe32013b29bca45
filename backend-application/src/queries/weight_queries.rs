use backend_domain::PatternWeights;

use crate::AppState;

pub async fn current_weights(state: &AppState) -> PatternWeights {
    state.weights.read().await.clone()
}
