use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use backend_domain::{ConfigRepository, PatternWeights};

pub struct ConfigFileRepository;

impl ConfigFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConfigFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigRepository for ConfigFileRepository {
    async fn load_pattern_weights(&self, path: &str) -> anyhow::Result<Option<PatternWeights>> {
        if !Path::new(path).exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).await?;
        let weights: PatternWeights = serde_yaml::from_str(&content)?;
        Ok(Some(weights))
    }

    async fn save_pattern_weights(&self, path: &str, weights: &PatternWeights) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_yaml::to_string(weights)?;
        fs::write(path, content).await?;
        Ok(())
    }
}
