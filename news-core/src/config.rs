use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::error::NewsError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub cache: CacheConfig,
    pub queue: QueueConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    pub min_interval_seconds: u64,
    pub max_interval_seconds: u64,
    /// How many of the newest items are eligible for re-emission.
    pub candidate_window: usize,
    /// Default cap used by `NewsQueue::archive`.
    pub retention_count: usize,
    /// Hard bound enforced on every insert.
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON endpoint serving a list of news items. `None` uses the bundled corpus.
    pub endpoint: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 30 * 60 }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            min_interval_seconds: 2 * 60,
            max_interval_seconds: 15 * 60,
            candidate_window: 10,
            retention_count: 100,
            capacity: 500,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_seconds: 10,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn validate(&self) -> Result<(), NewsError> {
        if self.ttl_seconds == 0 {
            return Err(NewsError::config("cache.ttl_seconds must be greater than zero"));
        }
        Ok(())
    }
}

impl QueueConfig {
    /// Short emission window for staging and local runs.
    pub fn staging() -> Self {
        Self {
            min_interval_seconds: 10,
            max_interval_seconds: 30,
            ..Self::default()
        }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_seconds)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_secs(self.max_interval_seconds)
    }

    pub fn validate(&self) -> Result<(), NewsError> {
        if self.max_interval_seconds == 0 {
            return Err(NewsError::config(
                "queue.max_interval_seconds must be greater than zero",
            ));
        }
        if self.min_interval_seconds > self.max_interval_seconds {
            return Err(NewsError::config(format!(
                "queue.min_interval_seconds ({}) exceeds queue.max_interval_seconds ({})",
                self.min_interval_seconds, self.max_interval_seconds
            )));
        }
        if self.candidate_window == 0 {
            return Err(NewsError::config("queue.candidate_window must be at least 1"));
        }
        if self.capacity == 0 {
            return Err(NewsError::config("queue.capacity must be at least 1"));
        }
        if self.retention_count > self.capacity {
            return Err(NewsError::config(format!(
                "queue.retention_count ({}) exceeds queue.capacity ({})",
                self.retention_count, self.capacity
            )));
        }
        Ok(())
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn endpoint_url(&self) -> Result<Option<Url>, NewsError> {
        self.endpoint
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(NewsError::from)
    }

    pub fn validate(&self) -> Result<(), NewsError> {
        if self.request_timeout_seconds == 0 {
            return Err(NewsError::config(
                "source.request_timeout_seconds must be greater than zero",
            ));
        }
        self.endpoint_url()
            .map_err(|e| NewsError::config(format!("source.endpoint: {e}")))?;
        Ok(())
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), NewsError> {
        self.cache.validate()?;
        self.queue.validate()?;
        self.source.validate()
    }

    /// `<config dir>/news-feed/config.json`
    pub fn config_file_path() -> Result<PathBuf, NewsError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            NewsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no platform configuration directory",
            ))
        })?;
        Ok(config_dir.join("news-feed").join("config.json"))
    }

    /// Reads and validates a config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, NewsError> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or writes and returns the defaults when the file is missing
    /// or unreadable.
    ///
    /// A file that parses but fails validation is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, NewsError> {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => Ok(config),
            Err(e @ NewsError::InvalidConfig(_)) => Err(e),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "could not load config, using defaults");
                let config = Self::default();
                if let Err(save_err) = config.save_to(path) {
                    warn!(
                        error = %save_err,
                        path = %path.display(),
                        "could not write default config"
                    );
                }
                Ok(config)
            }
        }
    }

    /// `load_or_default` against the platform config path.
    pub fn load() -> Result<Self, NewsError> {
        Self::load_or_default(Self::config_file_path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), NewsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn save(&self) -> Result<(), NewsError> {
        self.save_to(Self::config_file_path()?)
    }
}
