use backend_domain::SweepStatus;

use crate::AppState;

pub async fn sweep_status(state: &AppState) -> SweepStatus {
    state.sweep_status.read().await.clone()
}
