// Readiness checks over the storage and alert targets

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{timeout, Duration};

use backend_domain::ports::{AlertService, HealthCheckService};
use backend_domain::{MerchantRepository, RuntimeConfig};

pub struct DefaultHealthService {
    merchant_repo: Arc<dyn MerchantRepository>,
    alert_service: Arc<dyn AlertService>,
    config: RuntimeConfig,
}

impl DefaultHealthService {
    pub fn new(
        merchant_repo: Arc<dyn MerchantRepository>,
        alert_service: Arc<dyn AlertService>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            merchant_repo,
            alert_service,
            config,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    /// Pings the backing store, bounded by the request timeout so a
    /// wedged database cannot hang the ready endpoint.
    async fn check_database(&self) -> anyhow::Result<bool> {
        let limit = self.config.request_timeout_seconds.max(1);
        match timeout(Duration::from_secs(limit), self.merchant_repo.ping()).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(err)) => Err(err),
            Err(_) => anyhow::bail!("storage ping timed out after {limit}s"),
        }
    }

    async fn check_alert_target(&self) -> anyhow::Result<bool> {
        if self.config.alert_webhook_url.is_none() && self.config.webhook_url.is_none() {
            return Ok(false);
        }
        self.alert_service
            .check_alert_target(&self.config)
            .await
            .map(|_| true)
    }
}
