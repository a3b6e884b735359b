use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::source::ModuleDescriptor;
use super::RegistryError;
use crate::core::commands::CommandHandler;

/// A named, aliasable unit of behavior owned by exactly one module.
#[derive(Clone)]
pub struct Command {
    id: String,
    description: String,
    aliases: BTreeSet<String>,
    handler: Option<Rc<dyn CommandHandler>>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("bound", &self.handler.is_some())
            .finish()
    }
}

impl Command {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            aliases: BTreeSet::new(),
            handler: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn with_handler(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn add_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn handler(&self) -> Option<Rc<dyn CommandHandler>> {
        self.handler.clone()
    }

    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }

    /// True when `token` is the canonical id or one of the aliases.
    pub fn has_alias(&self, token: &str) -> bool {
        token == self.id || self.aliases.contains(token)
    }
}

/// An installed bundle of commands.
#[derive(Debug, Clone)]
pub struct Module {
    id: String,
    source_id: String,
    name: String,
    description: String,
    commands: Vec<Command>,
}

impl Module {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            name: name.into(),
            description: description.into(),
            commands: Vec::new(),
        }
    }

    /// Creates a module whose commands carry the catalog metadata but no handlers yet.
    pub fn from_descriptor(id: &str, source_id: &str, descriptor: &ModuleDescriptor) -> Self {
        let mut module = Self::new(id, source_id, &descriptor.name, &descriptor.description);
        for (command_id, meta) in &descriptor.commands {
            module.insert_command(
                Command::new(command_id, &meta.description).with_aliases(meta.aliases.iter().cloned()),
            );
        }
        module
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn qualified_id(&self) -> String {
        format!("{}:{}", self.source_id, self.id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Adds `command`, replacing any command with the same id in place.
    pub fn insert_command(&mut self, command: Command) {
        match self.commands.iter_mut().find(|c| c.id == command.id) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    /// Binds `handler` to `id`. Last registration wins; commands the catalog
    /// never advertised are created with an empty description.
    pub fn register_command(
        &mut self,
        id: &str,
        handler: impl CommandHandler + 'static,
    ) -> Result<&mut Command, RegistryError> {
        if id.is_empty() || id.contains(':') || id.contains(char::is_whitespace) {
            return Err(RegistryError::InvalidId(id.to_string()));
        }

        let handler: Rc<dyn CommandHandler> = Rc::new(handler);
        let index = match self.commands.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => {
                debug!(module = %self.id, command = id, "binding command missing from catalog");
                self.commands.push(Command::new(id, ""));
                self.commands.len() - 1
            }
        };

        let command = &mut self.commands[index];
        command.handler = Some(handler);
        Ok(command)
    }

    /// Looks up `token` in this module. An exact id beats an alias.
    pub fn command(&self, token: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.id == token)
            .or_else(|| self.commands.iter().find(|c| c.aliases.contains(token)))
    }

    pub fn command_mut(&mut self, id: &str) -> Option<&mut Command> {
        self.commands.iter_mut().find(|c| c.id == id)
    }

    pub fn has_command(&self, token: &str) -> bool {
        self.command(token).is_some()
    }

    pub fn unbound_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| !c.is_bound())
    }
}
