//! Runtime settings for the gallery

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://thesimpsonsapi.com/api/characters/random";

/// Number of characters fetched by one load
pub const DEFAULT_BATCH_SIZE: usize = 6;

/// Default location of the persistent store: ~/.gallery/storage.json
fn default_storage_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".gallery").join("storage.json")
}

#[derive(Clone, Debug)]
pub struct GalleryConfig {
    pub endpoint: String,
    pub batch_size: usize,
    pub storage_path: PathBuf,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            storage_path: default_storage_path(),
            request_timeout: None,
            user_agent: format!("gallery_core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GalleryConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
