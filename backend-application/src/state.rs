use std::sync::Arc;

use backend_domain::ports::{
    AlertService, ConfigRepository, HealthCheckService, MerchantRepository, TransactionRepository,
};
use backend_domain::services::ScoringEngine;
use backend_domain::{PatternWeights, RuntimeConfig, SweepStatus};
use tokio::sync::RwLock;

use crate::cache::RiskProfileCache;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub merchant_repo: Arc<dyn MerchantRepository>,
    pub transaction_repo: Arc<dyn TransactionRepository>,
    pub config_repo: Arc<dyn ConfigRepository>,
    pub alert_service: Arc<dyn AlertService>,
    pub health: Arc<dyn HealthCheckService>,
    pub engine: Arc<ScoringEngine>,
    pub cache: Arc<RiskProfileCache>,
    pub weights: Arc<RwLock<PatternWeights>>,
    pub metrics: Arc<Metrics>,
    pub sweep_status: Arc<RwLock<SweepStatus>>,
}
