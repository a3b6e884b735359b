//! Shared harness for the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use gterm::core::config::ConfigStore;
use gterm::core::loader::ModuleLoader;
use gterm::io::{MemoryClipboard, MemoryTerminal, OutputLog, RecordingNavigator};
use gterm::{DispatchOutcome, Session};

pub struct Harness {
    pub session: Session,
    pub output: OutputLog,
    pub web: RecordingNavigator,
    pub clipboard: MemoryClipboard,
}

impl Harness {
    /// A session backed by `config` with nothing installed.
    pub fn with_config(config: ConfigStore) -> Self {
        let (terminal, output) = MemoryTerminal::new();
        let web = RecordingNavigator::new();
        let clipboard = MemoryClipboard::new();
        let session = Session::new(config, ModuleLoader::new().expect("http client"))
            .with_terminal(terminal)
            .with_navigator(web.clone())
            .with_clipboard(clipboard.clone());

        Self {
            session,
            output,
            web,
            clipboard,
        }
    }

    /// In-memory config with the core modules installed.
    pub fn core() -> Self {
        let mut harness = Self::with_config(ConfigStore::in_memory());
        gterm::core::commands::install_core(&mut harness.session).expect("core modules");
        harness
    }

    pub async fn run(&mut self, line: &str) -> DispatchOutcome {
        self.session.dispatch(line).await
    }
}

pub fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read fixture {}: {e}", path.display()))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("gterm").join("config.json")
}

/// The JSON stored at `path`.
pub fn read_config(path: &Path) -> serde_json::Value {
    let body = std::fs::read_to_string(path).expect("config file");
    serde_json::from_str(&body).expect("config json")
}
