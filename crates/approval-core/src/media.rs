//! Public URLs for uploaded logos and photos

use crate::config::MediaConfig;

/// Maps object-store paths to public URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    base_url: String,
    bucket: String,
}

impl MediaResolver {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.public_base_url.clone(), config.bucket.clone())
    }

    /// Absolute URLs are passed through untouched
    pub fn public_url(&self, object_path: &str) -> String {
        if object_path.starts_with("http://") || object_path.starts_with("https://") {
            return object_path.to_string();
        }

        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            object_path.trim_start_matches('/')
        )
    }
}
