//! Durable home of the scheduler preferences: one pretty-printed JSON file
//! under a fixed name, written and read wholesale.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::SchedulerConfig;

/// The fixed key the record lives under.
pub const CONFIG_FILE: &str = "scheduler_config.json";

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CONFIG_FILE),
        }
    }

    /// Writes the whole record, creating the directory if needed.
    pub async fn save(&self, config: &SchedulerConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .context("Failed to write scheduler config")
    }

    /// Reads the record back; a missing or corrupt file means no record.
    pub async fn load(&self) -> Option<SchedulerConfig> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                debug!(path = %self.path.display(), %err, "ignoring unreadable scheduler config");
                None
            }
        }
    }
}
