use std::path::PathBuf;

use async_trait::async_trait;
use envlens_parser::{decode_batch, RawReading, DEFAULT_TIMESTAMP_FIELD};
use tracing::debug;

use crate::config::EnvlensConfig;
use crate::error::{PipelineError, Result};
use crate::profiles::LocationProfile;

/// Supplies the raw batch for a location.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, profile: &LocationProfile) -> Result<Vec<RawReading>>;
}

/// Reads batch exports from a directory, resolving each profile's `source` against it.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
    timestamp_field: String,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
        }
    }

    pub fn from_config(config: &EnvlensConfig) -> Self {
        Self::new(config.data_dir.clone()).with_timestamp_field(config.timestamp_field.clone())
    }

    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn fetch(&self, profile: &LocationProfile) -> Result<Vec<RawReading>> {
        let path = self.root.join(&profile.source);
        debug!(location = %profile.id, path = %path.display(), "reading batch export");

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| PipelineError::Source {
                location: profile.id.clone(),
                message: format!("{}: {err}", path.display()),
            })?;

        Ok(decode_batch(&profile.source, &content, &self.timestamp_field)?)
    }
}
