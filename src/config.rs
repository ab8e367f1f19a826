use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub input: InputRules,
    pub logging: LoggingRules,
}

/// How input lines are turned into records
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputRules {
    /// Try to read each line as a JSON object first.
    pub json: bool,
    /// Fall back to whitespace separated `key=value` pairs.
    pub key_value: bool,
    /// Turn `true`/`false` and numeric `key=value` values into typed values
    /// and strip surrounding quotes from the rest.
    pub coerce_scalars: bool,
}

impl Default for InputRules {
    fn default() -> Self {
        Self {
            json: true,
            key_value: true,
            coerce_scalars: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingRules {
    /// `tracing` filter directive used when neither `RUST_LOG` nor `-v` is given.
    pub level: String,
}

impl Default for LoggingRules {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FilterConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<FilterConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<FilterConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static FilterConfig {
    static DEFAULT_CONFIG: LazyLock<FilterConfig> = LazyLock::new(FilterConfig::default);
    &DEFAULT_CONFIG
}
