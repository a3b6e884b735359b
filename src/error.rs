use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::loader::LoadError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Startup error: {0}")]
    Load(#[from] LoadError),
    #[error("Ctrl-C error: {0}")]
    CtrlC(#[from] ctrlc::Error),
    #[error("Logging error: {0}")]
    Logging(String),
}
