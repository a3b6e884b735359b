use async_trait::async_trait;
use thiserror::Error;

mod builtin;
mod help;
mod modules;
mod not_found;
mod recall;

pub use builtin::{ClearCommand, CopyCommand, EchoCommand, OpenCommand, SleepCommand};
pub use help::HelpCommand;
pub use modules::ModulesCommand;
pub use not_found::SuggestCommand;
pub use recall::{DoCommand, WhatCommand, YCommand};

use crate::core::config::ConfigError;
use crate::core::loader::LoadError;
use crate::core::registry::{RegistryError, ResolveError, Source};
use crate::core::session::Session;

/// Command id the dispatcher falls back to when nothing matches.
pub const NOT_FOUND_COMMAND: &str = "command_not_found";

/// Id of the always-present catalog holding the core modules.
pub const CORE_SOURCE: &str = "_";

const CORE_REPO: &str = include_str!("../../../assets/core_repo.json");

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    ExecutionError(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The behavior bound to a command id.
///
/// `full` is the token the user typed (`u` for `u rust`), `rest` everything
/// after the first space.
#[async_trait(?Send)]
pub trait CommandHandler {
    async fn run(&self, session: &mut Session, full: &str, rest: &str) -> Result<(), CommandError>;
}

/// Registers the `_` catalog and installs `_:main` and `_:modules`.
pub fn install_core(session: &mut Session) -> Result<(), LoadError> {
    let source = Source::from_json(CORE_REPO).map_err(|e| LoadError::InvalidDescriptor {
        origin: CORE_SOURCE.to_string(),
        reason: e.to_string(),
    })?;
    session.registry.add_source(source)?;

    let main = session.registry.register("_:main")?;
    main.register_command("help", HelpCommand)?;
    main.register_command("do", DoCommand)?;
    main.register_command("y", YCommand)?;
    main.register_command("what", WhatCommand)?;
    main.register_command("copy", CopyCommand)?;
    main.register_command("open", OpenCommand)?;
    main.register_command("sleep", SleepCommand)?;
    main.register_command("echo", EchoCommand)?;
    main.register_command("clear", ClearCommand)?;
    main.register_command(NOT_FOUND_COMMAND, SuggestCommand::help())?;

    let modules = session.registry.register("_:modules")?;
    modules.register_command("modules", ModulesCommand)?;
    Ok(())
}
