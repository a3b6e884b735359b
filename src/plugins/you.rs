use super::SearchCommand;
use crate::core::commands::{SuggestCommand, NOT_FOUND_COMMAND};
use crate::core::registry::{Module, RegistryError};

const YOUCHAT: SearchCommand = SearchCommand::new(
    "https://you.com/search?q={q}&tbm=youchat&fromExtension=true",
    "https://you.com/",
);
const SEARCH: SearchCommand = SearchCommand::new(
    "https://you.com/search?q={q}&fromExtension=true",
    "https://you.com/",
);
const CHAT: SearchCommand = SearchCommand::new(
    "https://you.com/search?q=Loading...&cid={q}&tbm=youchat",
    "https://you.com/chat",
);

pub fn install(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command("you", YOUCHAT)?;
    module.register_command("you-search", SEARCH)?;
    module.register_command("chat", CHAT)?;
    // Unknown lines become youchat questions.
    module.register_command(NOT_FOUND_COMMAND, SuggestCommand::with_prefix("u"))?;
    Ok(())
}
