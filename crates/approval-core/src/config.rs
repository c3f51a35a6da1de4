//! Configuration management for the approval platform

use crate::error::{Result, WorkflowError};
use approval_types::{ActorRole, SortOrder, UserId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_store")]
    pub store: StoreConfig,

    pub media: MediaConfig,

    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(alias = "root", default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(alias = "url")] // Accept both 'public_base_url' and 'url'
    pub public_base_url: String,

    #[serde(default = "default_bucket")]
    pub bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReviewConfig {
    #[serde(default)]
    pub admin_ids: Vec<String>,

    #[serde(default)]
    pub default_order: SortOrder,
}

fn default_store() -> StoreConfig {
    StoreConfig {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(crate::paths::DEFAULT_DATA_ROOT)
}

fn default_bucket() -> String {
    "profile-media".to_string()
}

impl PlatformConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WorkflowError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| WorkflowError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.media.public_base_url.trim().is_empty() {
            return Err(WorkflowError::Config("Media public_base_url is required".to_string()));
        }

        if self.media.bucket.trim().is_empty() {
            return Err(WorkflowError::Config("Media bucket is required".to_string()));
        }

        if self.store.data_dir.as_os_str().is_empty() {
            return Err(WorkflowError::Config("Store data_dir is required".to_string()));
        }

        if self.review.admin_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(WorkflowError::Config("Admin ids must not be blank".to_string()));
        }

        Ok(())
    }

    /// Resolve the role of an account from the configured admin list
    pub fn actor_role(&self, user_id: &UserId) -> ActorRole {
        if self.review.admin_ids.iter().any(|id| id == user_id.as_str()) {
            ActorRole::Admin
        } else {
            ActorRole::Member
        }
    }
}
