use super::SearchCommand;
use crate::core::registry::{Module, RegistryError};

pub fn install(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command("pen", SearchCommand::fixed("https://pen.new/"))?;
    module.register_command("keycode", SearchCommand::fixed("https://keycode.info/"))?;
    Ok(())
}
