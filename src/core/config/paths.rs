use std::env;
use std::path::PathBuf;

use super::ConfigError;
use crate::path::PathExpander;

pub const CONFIG_ENV: &str = "GTERM_CONFIG";
const APP_DIR: &str = "gterm";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub history_file: PathBuf,
}

impl ConfigPaths {
    /// `--config` beats `GTERM_CONFIG`, which beats the platform config dir.
    pub fn resolve(config_override: Option<&str>) -> Result<Self, ConfigError> {
        let requested = config_override
            .map(str::to_string)
            .or_else(|| env::var(CONFIG_ENV).ok());
        let config_file = match requested {
            Some(path) if !path.trim().is_empty() => PathExpander::new().expand(path.trim())?,
            _ => dirs::config_dir()
                .ok_or(ConfigError::HomeDirNotFound)?
                .join(APP_DIR)
                .join("config.json"),
        };

        let history_file = dirs::data_dir()
            .or_else(|| config_file.parent().map(PathBuf::from))
            .ok_or(ConfigError::HomeDirNotFound)?
            .join(APP_DIR)
            .join("history");

        Ok(Self {
            config_file,
            history_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override() {
        let paths = ConfigPaths::resolve(Some("/tmp/gterm-test/config.json")).unwrap();
        assert_eq!(paths.config_file, PathBuf::from("/tmp/gterm-test/config.json"));
        assert!(paths.history_file.ends_with("gterm/history"));
    }

    #[test]
    fn test_tilde_override_is_expanded() {
        let paths = ConfigPaths::resolve(Some("~/gterm.json")).unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(paths.config_file, home.join("gterm.json"));
    }
}
