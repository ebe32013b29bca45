// Webhook alert delivery for critical findings

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::json;
use tracing::warn;

use backend_domain::ports::AlertService;
use backend_domain::{AnomalyFinding, RuntimeConfig};

#[derive(Default)]
pub struct DefaultAlertService;

impl DefaultAlertService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertService for DefaultAlertService {
    fn spawn_alerts(&self, config: RuntimeConfig, findings: Vec<AnomalyFinding>) {
        if findings.is_empty() {
            return;
        }
        // Delivery is fire-and-forget; a dead webhook never blocks the
        // scoring path.
        tokio::spawn(async move {
            if let Err(err) = send_alerts(&config, &findings).await {
                warn!("alert webhook failed: {}", err);
            }
        });
    }

    async fn check_alert_target(&self, config: &RuntimeConfig) -> Result<()> {
        let url = resolve_alert_url(config)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("alert webhook responded {}", response.status());
        }
        Ok(())
    }
}

async fn send_alerts(config: &RuntimeConfig, findings: &[AnomalyFinding]) -> Result<()> {
    let url = resolve_alert_url(config)?;
    let lines = findings
        .iter()
        .map(|finding| {
            format!(
                "{} {} {}: {}",
                finding.merchant_id,
                finding.pattern.as_str(),
                finding.severity.as_str(),
                finding.reason
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let payload = json!({
        "message": format!("{} critical risk findings\n{}", findings.len(), lines),
        "findings": findings,
    });

    let client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?;
    let mut request = client.post(&url).json(&payload);
    if let Some(token) = &config.alert_webhook_token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    request.send().await?.error_for_status()?;
    Ok(())
}

fn resolve_alert_url(config: &RuntimeConfig) -> Result<String> {
    config
        .alert_webhook_url
        .clone()
        .or_else(|| config.webhook_url.clone())
        .ok_or_else(|| anyhow::anyhow!("no alert webhook configured"))
}
