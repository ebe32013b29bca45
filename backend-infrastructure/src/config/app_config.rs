use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_application::FingerprintStrategy;
use backend_domain::{DbConfig, DetectorConfig, PatternWeights, RuntimeConfig, ScoringConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub storage_backend: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub report_dir: String,
    pub public_base_url: String,
    pub webhook_url: Option<String>,
    pub alert_webhook_url: Option<String>,
    pub alert_webhook_token: Option<String>,
    pub weights_path: String,
    pub fingerprint_strategy: String,
    pub cache_capacity: usize,
    pub worker_pool_size: usize,
    pub batch_timeout_seconds: u64,
    pub sweep_hour: u32,
    pub sweep_minute: u32,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub detector: DetectorConfig,
    pub scoring: ScoringConfig,
    pub weights: PatternWeights,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            storage_backend: "clickhouse".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "riskline".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            report_dir: "./reports".to_string(),
            public_base_url: "http://127.0.0.1:3240".to_string(),
            webhook_url: None,
            alert_webhook_url: None,
            alert_webhook_token: None,
            weights_path: "./pattern_weights.yaml".to_string(),
            fingerprint_strategy: "count-latest".to_string(),
            cache_capacity: 1024,
            worker_pool_size: 8,
            batch_timeout_seconds: 300,
            sweep_hour: 2,
            sweep_minute: 30,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 15,
            detector: DetectorConfig::default(),
            scoring: ScoringConfig::default(),
            weights: PatternWeights::default(),
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("RISKLINE_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(user) = &self.clickhouse_user {
            if user.trim().is_empty() {
                self.clickhouse_user = None;
            }
        }
        if let Some(password) = &self.clickhouse_password {
            if password.trim().is_empty() {
                self.clickhouse_password = None;
            }
        }
        if let Some(webhook_url) = &self.webhook_url {
            if webhook_url.trim().is_empty() {
                self.webhook_url = None;
            }
        }
        if let Some(alert_url) = &self.alert_webhook_url {
            if alert_url.trim().is_empty() {
                self.alert_webhook_url = None;
            }
        }
        if let Some(token) = &self.alert_webhook_token {
            if token.trim().is_empty() {
                self.alert_webhook_token = None;
            }
        }
        self.storage_backend = self.storage_backend.trim().to_lowercase();
        self.fingerprint_strategy = self.fingerprint_strategy.trim().to_lowercase();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.report_dir = resolve_path(base, &self.report_dir);
        self.weights_path = resolve_path(base, &self.weights_path);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.public_base_url.trim().is_empty() {
            return Err(anyhow!("public_base_url must not be empty"));
        }
        if !matches!(self.storage_backend.as_str(), "clickhouse" | "memory") {
            return Err(anyhow!(
                "storage_backend must be 'clickhouse' or 'memory', got '{}'",
                self.storage_backend
            ));
        }
        if FingerprintStrategy::parse(&self.fingerprint_strategy).is_none() {
            return Err(anyhow!(
                "fingerprint_strategy must be 'count-latest' or 'digest', got '{}'",
                self.fingerprint_strategy
            ));
        }
        if self.cache_capacity == 0 {
            return Err(anyhow!("cache_capacity must be greater than 0"));
        }
        if self.worker_pool_size == 0 {
            return Err(anyhow!("worker_pool_size must be greater than 0"));
        }
        if self.batch_timeout_seconds == 0 {
            return Err(anyhow!("batch_timeout_seconds must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.sweep_hour > 23 || self.sweep_minute > 59 {
            return Err(anyhow!("sweep_hour or sweep_minute out of range"));
        }
        validate_detector(&self.detector)?;
        validate_scoring(&self.scoring)?;
        validate_weights(&self.weights)?;
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            storage_backend: self.storage_backend.clone(),
            report_dir: self.report_dir.clone(),
            public_base_url: self.public_base_url.clone(),
            webhook_url: self.webhook_url.clone(),
            alert_webhook_url: self.alert_webhook_url.clone(),
            alert_webhook_token: self.alert_webhook_token.clone(),
            weights_path: self.weights_path.clone(),
            fingerprint_strategy: self.fingerprint_strategy.clone(),
            cache_capacity: self.cache_capacity,
            worker_pool_size: self.worker_pool_size,
            batch_timeout_seconds: self.batch_timeout_seconds,
            sweep_hour: self.sweep_hour,
            sweep_minute: self.sweep_minute,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            detector: self.detector.clone(),
            scoring: self.scoring.clone(),
            weights: self.weights.clone(),
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("RISKLINE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("RISKLINE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("RISKLINE_STORAGE_BACKEND") {
            self.storage_backend = value;
        }
        if let Ok(value) = env::var("RISKLINE_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("RISKLINE_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("RISKLINE_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("RISKLINE_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("RISKLINE_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("RISKLINE_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("RISKLINE_WEBHOOK_URL") {
            self.webhook_url = Some(value);
        }
        if let Ok(value) = env::var("RISKLINE_ALERT_WEBHOOK_URL") {
            self.alert_webhook_url = Some(value);
        }
        if let Ok(value) = env::var("RISKLINE_ALERT_WEBHOOK_TOKEN") {
            self.alert_webhook_token = Some(value);
        }
        if let Ok(value) = env::var("RISKLINE_WEIGHTS_PATH") {
            self.weights_path = value;
        }
        if let Ok(value) = env::var("RISKLINE_FINGERPRINT_STRATEGY") {
            self.fingerprint_strategy = value;
        }
        if let Ok(value) = env::var("RISKLINE_CACHE_CAPACITY") {
            self.cache_capacity = value.parse().unwrap_or(self.cache_capacity);
        }
        if let Ok(value) = env::var("RISKLINE_WORKER_POOL_SIZE") {
            self.worker_pool_size = value.parse().unwrap_or(self.worker_pool_size);
        }
        if let Ok(value) = env::var("RISKLINE_BATCH_TIMEOUT_SECONDS") {
            self.batch_timeout_seconds = value.parse().unwrap_or(self.batch_timeout_seconds);
        }
        if let Ok(value) = env::var("RISKLINE_SWEEP_HOUR") {
            self.sweep_hour = value.parse().unwrap_or(self.sweep_hour);
        }
        if let Ok(value) = env::var("RISKLINE_SWEEP_MINUTE") {
            self.sweep_minute = value.parse().unwrap_or(self.sweep_minute);
        }
        if let Ok(value) = env::var("RISKLINE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("RISKLINE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn validate_detector(detector: &DetectorConfig) -> Result<()> {
    if detector.nocturnal_start_hour > 23 || detector.nocturnal_end_hour > 23 {
        return Err(anyhow!("nocturnal window hours must be 0..=23"));
    }
    if detector.velocity_window_minutes == 0 {
        return Err(anyhow!("velocity_window_minutes must be greater than 0"));
    }
    if !(detector.spike_multiplier.is_finite() && detector.spike_multiplier > 0.0) {
        return Err(anyhow!("spike_multiplier must be a positive number"));
    }
    if !(detector.round_unit.is_finite() && detector.round_unit > 0.0) {
        return Err(anyhow!("round_unit must be a positive number"));
    }
    if !(detector.round_frequency_threshold > 0.0 && detector.round_frequency_threshold <= 1.0) {
        return Err(anyhow!("round_frequency_threshold must be within (0, 1]"));
    }
    if detector.round_window_hours == 0 || detector.concentration_window_hours == 0 {
        return Err(anyhow!("detector window hours must be greater than 0"));
    }
    if !(detector.concentration_threshold > 0.0 && detector.concentration_threshold <= 1.0) {
        return Err(anyhow!("concentration_threshold must be within (0, 1]"));
    }
    if !(detector.large_amount_ceiling.is_finite() && detector.large_amount_ceiling > 0.0) {
        return Err(anyhow!("large_amount_ceiling must be a positive number"));
    }
    if !(detector.large_amount_multiplier.is_finite() && detector.large_amount_multiplier > 0.0) {
        return Err(anyhow!("large_amount_multiplier must be a positive number"));
    }
    Ok(())
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<()> {
    if scoring.scoring_window_days <= 0 {
        return Err(anyhow!("scoring_window_days must be greater than 0"));
    }
    if scoring.dedup_window_minutes <= 0 {
        return Err(anyhow!("dedup_window_minutes must be greater than 0"));
    }
    Ok(())
}

fn validate_weights(weights: &PatternWeights) -> Result<()> {
    for (name, value) in [
        ("late_night", weights.late_night),
        ("high_velocity", weights.high_velocity),
        ("round_amount", weights.round_amount),
        ("customer_concentration", weights.customer_concentration),
        ("large_amount", weights.large_amount),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow!("weight {} must be a non-negative number", name));
        }
    }
    Ok(())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_storage_backend() {
        let mut config = AppConfig::default();
        config.storage_backend = "postgres".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let mut config = AppConfig::default();
        config.detector.round_frequency_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.detector.nocturnal_start_hour = 24;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.weights.high_velocity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn normalize_drops_blank_optionals() {
        let mut config = AppConfig::default();
        config.api_token = Some("  ".to_string());
        config.alert_webhook_url = Some(String::new());
        config.storage_backend = " Memory ".to_string();
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.alert_webhook_url.is_none());
        assert_eq!(config.storage_backend, "memory");
    }
}
