use std::path::{Path, PathBuf};

use envlens_parser::{TimestampParser, DEFAULT_TIMESTAMP_FIELD};
use serde::Deserialize;
use thiserror::Error;

use crate::profiles::{LocationProfile, ProfileError, ProfileRegistry};
use crate::trend::Resolution;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid profile configuration: {0}")]
    Profile(#[from] ProfileError),
    #[error("timestamp_formats must list at least one format")]
    NoTimestampFormats,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    timestamp_field: Option<String>,
    timestamp_formats: Option<Vec<String>>,
    trend_resolutions: Option<Vec<Resolution>>,
    #[serde(default)]
    profiles: Vec<LocationProfile>,
}

/// Runtime configuration shared by the data source and the orchestrator.
#[derive(Debug, Clone)]
pub struct EnvlensConfig {
    pub data_dir: PathBuf,
    pub timestamp_field: String,
    pub timestamp_parser: TimestampParser,
    pub trend_resolutions: Vec<Resolution>,
    pub profiles: ProfileRegistry,
}

impl Default for EnvlensConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            timestamp_parser: TimestampParser::default(),
            trend_resolutions: vec![Resolution::Hour, Resolution::Day],
            profiles: ProfileRegistry::reference(),
        }
    }
}

impl EnvlensConfig {
    /// Parses a TOML document; omitted keys keep their defaults and an empty
    /// `profiles` list keeps the reference registry.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(dir) = file.data_dir {
            config.data_dir = dir;
        }
        if let Some(field) = file.timestamp_field {
            config.timestamp_field = field;
        }
        if let Some(formats) = file.timestamp_formats {
            if formats.is_empty() {
                return Err(ConfigError::NoTimestampFormats);
            }
            config.timestamp_parser = TimestampParser::new(formats);
        }
        if let Some(resolutions) = file.trend_resolutions {
            config.trend_resolutions = resolutions;
        }
        if !file.profiles.is_empty() {
            config.profiles = ProfileRegistry::new(file.profiles)?;
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
