use tracing::info;

use crate::core::commands::CommandError;
use crate::core::config::{ConfigStore, INSTALLED_MODULES};
use crate::core::loader::{LoadError, ModuleLoader};
use crate::core::registry::{ModuleRef, Registry};
use crate::io::{
    Clipboard, ConsoleNavigator, ConsoleTerminal, Navigator, Osc52Clipboard, Style, Terminal,
};

/// Per-session scratch registers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    /// Remembered command, replayed by a bare `y`.
    pub y: String,
    pub last_copy: String,
}

/// Everything one terminal session owns. Commands receive it mutably.
pub struct Session {
    pub registry: Registry,
    pub registers: Registers,
    pub config: ConfigStore,
    pub loader: ModuleLoader,
    pub io: Box<dyn Terminal>,
    pub web: Box<dyn Navigator>,
    pub clipboard: Box<dyn Clipboard>,
    pub(crate) depth: usize,
}

impl Session {
    pub fn new(config: ConfigStore, loader: ModuleLoader) -> Self {
        Self {
            registry: Registry::new(),
            registers: Registers::default(),
            config,
            loader,
            io: Box::new(ConsoleTerminal::new()),
            web: Box::new(ConsoleNavigator::new()),
            clipboard: Box::new(Osc52Clipboard),
            depth: 0,
        }
    }

    pub fn with_terminal(mut self, terminal: impl Terminal + 'static) -> Self {
        self.io = Box::new(terminal);
        self
    }

    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.web = Box::new(navigator);
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn println(&mut self, text: &str, style: Style) {
        self.io.println(text, style);
    }

    pub fn out(&mut self, text: &str) {
        self.io.println(text, Style::Out);
    }

    pub fn copy(&mut self, text: &str) {
        self.registers.last_copy = text.to_string();
        self.clipboard.copy(text);
    }

    pub fn recopy(&mut self) {
        let text = self.registers.last_copy.clone();
        self.clipboard.copy(&text);
    }

    /// Loads a module and records it in `installed_modules`.
    pub async fn install_module(&mut self, id: &str) -> Result<(), CommandError> {
        self.loader.load_module(&mut self.registry, id).await?;
        self.config.add_to_list(INSTALLED_MODULES, id)?;
        self.config.save()?;
        info!(module = id, "module installed");
        Ok(())
    }

    /// Removes a module from the registry and from `installed_modules`.
    /// Entries naming the same module with or without a source prefix are
    /// all dropped.
    pub fn uninstall_module(&mut self, id: &str) -> Result<(), CommandError> {
        let removed = self.registry.uninstall(id)?;
        let qualified = removed.qualified_id();
        self.config.remove_from_list_where(INSTALLED_MODULES, |entry| {
            entry == id
                || entry == qualified
                || matches!(ModuleRef::parse(entry), Ok(ModuleRef::Bare(m)) if m == removed.id())
        })?;
        self.config.save()?;
        info!(module = %qualified, "module removed");
        Ok(())
    }

    /// Fetches a catalog for this session only.
    pub async fn load_source(&mut self, url: &str) -> Result<String, LoadError> {
        self.loader.load_source(&mut self.registry, url).await
    }
}
