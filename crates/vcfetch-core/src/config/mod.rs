//! Persisted configuration and policy resolution.
//!
//! Config values are flat, dotted, case-insensitive keys (`http.maxretries`).
//! They come from `$XDG_CONFIG_HOME/vcfetch/config.toml` and from `-c key=value`
//! overrides; [`resolve_policy`] layers environment variables on top and
//! produces the immutable [`RetryPolicy`](crate::retry::RetryPolicy).

mod error;
mod resolve;

pub use error::ConfigError;
pub use resolve::{
    resolve_policy, resolve_policy_with, ENV_MAX_RETRIES, ENV_MAX_RETRY_TIME, ENV_RETRY_AFTER,
    KEY_MAX_RETRIES, KEY_MAX_RETRY_TIME, KEY_RETRY_AFTER,
};

use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value lookup the resolver reads persisted settings through.
pub trait ConfigSource {
    /// Raw value for `key`. Keys compare case-insensitively.
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory key/value layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: BTreeMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flatten a TOML document: `[http] maxRetries = 3` becomes `http.maxretries = "3"`.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(data)?;
        let mut source = Self::new();
        flatten_into(&mut source, "", &table);
        Ok(source)
    }

    /// Parse git-style `key=value` overrides.
    pub fn from_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<Self, ConfigError> {
        let mut source = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    source.insert(key.trim(), value.trim());
                }
                _ => return Err(ConfigError::InvalidOverride(pair.to_string())),
            }
        }
        Ok(source)
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(&key.to_ascii_lowercase()).cloned()
    }
}

fn flatten_into(source: &mut MapSource, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_into(source, &full, inner),
            toml::Value::String(s) => source.insert(&full, s.clone()),
            toml::Value::Integer(i) => source.insert(&full, i.to_string()),
            toml::Value::Float(f) => source.insert(&full, f.to_string()),
            toml::Value::Boolean(b) => source.insert(&full, b.to_string()),
            toml::Value::Datetime(d) => source.insert(&full, d.to_string()),
            toml::Value::Array(_) => {
                tracing::debug!(key = %full, "ignoring array config value");
            }
        }
    }
}

/// Several layers, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<MapSource>,
}

impl LayeredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer below the existing ones.
    pub fn with_layer(mut self, layer: MapSource) -> Self {
        self.layers.push(layer);
        self
    }
}

impl ConfigSource for LayeredConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }
}

/// Where the config file would live; it need not exist.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vcfetch")?;
    Ok(xdg_dirs.get_config_home().join("vcfetch").join("config.toml"))
}

/// Load a config file. A missing file is an empty layer.
pub fn load_file(path: &Path) -> Result<MapSource> {
    if !path.exists() {
        tracing::debug!("no config file at {}", path.display());
        return Ok(MapSource::new());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let source = MapSource::from_toml_str(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(source)
}

/// Load `config.toml` from the XDG config directory.
pub fn load_default() -> Result<MapSource> {
    load_file(&config_path()?)
}

#[derive(Debug, Serialize)]
struct HttpSection {
    #[serde(rename = "maxRetries")]
    max_retries: u32,
    #[serde(rename = "retryAfter")]
    retry_after: u64,
    #[serde(rename = "maxRetryTime", skip_serializing_if = "Option::is_none")]
    max_retry_time: Option<u64>,
}

#[derive(Debug, Serialize)]
struct PolicyDocument {
    http: HttpSection,
}

/// Render a resolved policy in config-file form (whole seconds).
pub fn policy_to_toml(policy: &RetryPolicy) -> Result<String> {
    let doc = PolicyDocument {
        http: HttpSection {
            max_retries: policy.max_retries,
            retry_after: policy.default_retry_after.as_secs(),
            max_retry_time: policy.max_retry_time.map(|d| d.as_secs()),
        },
    };
    Ok(toml::to_string_pretty(&doc)?)
}
