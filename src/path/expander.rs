use std::path::{Path, PathBuf};

use crate::core::config::ConfigError;

#[derive(Clone, Default)]
pub struct PathExpander;

impl PathExpander {
    pub fn new() -> Self {
        Self
    }

    /// Expands a leading `~` or `~/`. Other paths pass through untouched.
    pub fn expand(&self, path: &str) -> Result<PathBuf, ConfigError> {
        if path == "~" {
            return self.home_dir();
        }
        match path.strip_prefix("~/") {
            Some(stripped) => {
                let mut expanded = self.home_dir()?;
                expanded.extend(stripped.split('/').filter(|part| !part.is_empty()));
                Ok(expanded)
            }
            // "~user/..." is left alone
            None => Ok(Path::new(path).to_path_buf()),
        }
    }

    pub fn home_dir(&self) -> Result<PathBuf, ConfigError> {
        dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)
    }
}
