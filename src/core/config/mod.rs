//! Persisted key/value configuration.
//!
//! The store is a single JSON object on disk. It is read once at startup and
//! written back explicitly after every mutation.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

mod paths;

pub use paths::ConfigPaths;

/// Source URLs loaded at startup.
pub const ADDED_REPOS: &str = "added_repos";
/// Module ids installed at startup, bare or `source:module`.
pub const INSTALLED_MODULES: &str = "installed_modules";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config value {0} is not a list")]
    NotAList(String),
}

#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            values: Map::new(),
        }
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads the backing file. Returns `false` when there is nothing to load.
    /// A malformed file leaves the store empty.
    pub fn load(&mut self) -> Result<bool, ConfigError> {
        self.values.clear();
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if !path.exists() {
            return Ok(false);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        self.values = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), keys = self.values.len(), "config loaded");
        Ok(true)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_error = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(&self.values).map_err(|source| {
            ConfigError::Parse {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(path, content).map_err(io_error)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// String entries of a list value; empty when the key is missing.
    pub fn list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.values.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()),
            Some(_) => Err(ConfigError::NotAList(key.to_string())),
        }
    }

    /// Like [`ConfigStore::list`], but stores `defaults` first if the key is missing.
    pub fn list_or_init(&mut self, key: &str, defaults: &[&str]) -> Result<Vec<String>, ConfigError> {
        if !self.values.contains_key(key) {
            self.set(key, defaults.iter().map(|s| Value::from(*s)).collect::<Vec<_>>());
        }
        self.list(key)
    }

    /// Appends `value` unless already present. Returns whether it was added.
    pub fn add_to_list(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        let entry = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(items) = entry else {
            return Err(ConfigError::NotAList(key.to_string()));
        };
        if items.iter().any(|v| v.as_str() == Some(value)) {
            return Ok(false);
        }
        items.push(Value::from(value));
        Ok(true)
    }

    /// Removes every entry accepted by `matches`. Returns how many went away.
    pub fn remove_from_list_where(
        &mut self,
        key: &str,
        matches: impl Fn(&str) -> bool,
    ) -> Result<usize, ConfigError> {
        let Some(entry) = self.values.get_mut(key) else {
            return Ok(0);
        };
        let Value::Array(items) = entry else {
            return Err(ConfigError::NotAList(key.to_string()));
        };
        let before = items.len();
        items.retain(|v| !v.as_str().is_some_and(&matches));
        Ok(before - items.len())
    }

    pub fn remove_from_list(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        self.remove_from_list_where(key, |v| v == value)
            .map(|removed| removed > 0)
    }
}
