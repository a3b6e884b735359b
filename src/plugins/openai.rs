use async_trait::async_trait;

use super::goto;
use crate::core::commands::{CommandError, CommandHandler};
use crate::core::registry::{Module, RegistryError};
use crate::core::session::Session;
use crate::io::encode_uri_component;

const HOME: &str = "https://chat.openai.com/";

/// `chatgpt [c/<id> | share/<id> | <id>]`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatGptCommand;

impl ChatGptCommand {
    pub fn url(rest: &str) -> Result<String, CommandError> {
        let rest = rest.trim();
        if rest.is_empty() {
            return Ok(HOME.to_string());
        }

        let (kind, id) = match rest.split_once('/') {
            Some(("c", id)) => ("c", id),
            Some(("share", id)) => ("share", id),
            Some((other, _)) => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown chat kind {other:?}, expected c/<id> or share/<id>"
                )))
            }
            None => ("c", rest),
        };
        if id.is_empty() {
            return Err(CommandError::InvalidArguments("missing chat id".to_string()));
        }
        Ok(format!("{HOME}{kind}/{}", encode_uri_component(id)))
    }
}

#[async_trait(?Send)]
impl CommandHandler for ChatGptCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let url = Self::url(rest)?;
        goto(session, &url);
        Ok(())
    }
}

pub fn install(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command("chatgpt", ChatGptCommand)?;
    Ok(())
}
