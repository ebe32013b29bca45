use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tokio::sync::RwLock;
use tracing::{info, warn};

use backend_application::{AppState, Metrics, RiskProfileCache};
use backend_domain::ports::{
    AlertService, HealthCheckService, MerchantRepository, TransactionRepository,
};
use backend_domain::{ConfigRepository, ScoringEngine, SweepStatus};
use backend_infrastructure::{
    AppConfig, ClickhouseStore, ConfigFileRepository, DefaultAlertService, DefaultHealthService,
    MemoryStore,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let (merchant_repo, transaction_repo): (
            Arc<dyn MerchantRepository>,
            Arc<dyn TransactionRepository>,
        ) = if runtime_config.storage_backend == "memory" {
            info!("using in-memory storage backend");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        } else {
            let mut clickhouse = Client::default()
                .with_url(&db_config.clickhouse_url)
                .with_database(&db_config.clickhouse_database);
            if let Some(user) = &db_config.clickhouse_user {
                clickhouse = clickhouse.with_user(user);
            }
            if let Some(password) = &db_config.clickhouse_password {
                clickhouse = clickhouse.with_password(password);
            }
            let store = Arc::new(ClickhouseStore::new(
                clickhouse,
                db_config.clickhouse_database.clone(),
            ));
            store.ensure_schema().await?;
            (store.clone(), store)
        };

        let config_repo = Arc::new(ConfigFileRepository::new());
        let weights = config_repo
            .load_pattern_weights(&runtime_config.weights_path)
            .await
            .unwrap_or_default()
            .unwrap_or_else(|| runtime_config.weights.clone());

        let alert_service: Arc<dyn AlertService> = Arc::new(DefaultAlertService::new());
        let health: Arc<dyn HealthCheckService> = Arc::new(DefaultHealthService::new(
            merchant_repo.clone(),
            alert_service.clone(),
            runtime_config.clone(),
        ));
        match health.check_alert_target().await {
            Ok(true) => info!("alert target reachable"),
            Ok(false) => {}
            Err(err) => warn!("alert target check failed: {}", err),
        }

        let state = AppState {
            config: runtime_config.clone(),
            merchant_repo,
            transaction_repo,
            config_repo,
            alert_service,
            health,
            engine: Arc::new(ScoringEngine::default()),
            cache: Arc::new(RiskProfileCache::new(runtime_config.cache_capacity)),
            weights: Arc::new(RwLock::new(weights)),
            metrics: Arc::new(Metrics::default()),
            sweep_status: Arc::new(RwLock::new(SweepStatus::default())),
        };

        Ok(Self { state })
    }
}
