//! In-memory session used by unit tests.

use crate::core::commands::install_core;
use crate::core::config::ConfigStore;
use crate::core::dispatcher::DispatchOutcome;
use crate::core::loader::ModuleLoader;
use crate::core::session::Session;
use crate::io::{MemoryClipboard, MemoryTerminal, OutputLog, RecordingNavigator};
use crate::plugins;

pub struct TestSession {
    pub session: Session,
    pub output: OutputLog,
    pub web: RecordingNavigator,
    pub clipboard: MemoryClipboard,
}

impl TestSession {
    /// A session with only the core modules installed.
    pub fn new() -> Self {
        let (terminal, output) = MemoryTerminal::new();
        let web = RecordingNavigator::new();
        let clipboard = MemoryClipboard::new();

        let loader = ModuleLoader::new().expect("http client");
        let mut session = Session::new(ConfigStore::in_memory(), loader)
            .with_terminal(terminal)
            .with_navigator(web.clone())
            .with_clipboard(clipboard.clone());
        install_core(&mut session).expect("core modules");

        Self {
            session,
            output,
            web,
            clipboard,
        }
    }

    /// Like [`TestSession::new`], with the bundled plugin catalog loaded but
    /// nothing from it installed.
    pub fn with_builtin_source() -> Self {
        let mut harness = Self::new();
        harness
            .session
            .registry
            .add_source(plugins::builtin_source().expect("bundled catalog"))
            .expect("builtin source");
        harness
    }

    /// Installs plugin modules without touching the config.
    pub async fn with_modules(ids: &[&str]) -> Self {
        let mut harness = Self::with_builtin_source();
        for id in ids {
            harness
                .session
                .loader
                .load_module(&mut harness.session.registry, id)
                .await
                .expect("plugin module");
        }
        harness.output.clear();
        harness
    }

    pub async fn run(&mut self, line: &str) -> DispatchOutcome {
        self.session.dispatch(line).await
    }
}
