use async_trait::async_trait;

use super::{goto, SearchCommand};
use crate::core::commands::{CommandError, CommandHandler};
use crate::core::registry::{Module, RegistryError};
use crate::core::session::Session;
use crate::io::encode_uri_component;

const TWITCH: &str = "https://www.twitch.tv/";
const CATEGORY: &str = "https://www.twitch.tv/directory/category/";

/// Shortcut names accepted by `twcat`.
const CATEGORY_SHORTCUTS: &[(&str, &str)] = &[
    ("mc", "minecraft"),
    ("dev", "software-and-game-development"),
    ("pydev", "software-and-game-development?tl=python"),
    ("jsdev", "software-and-game-development?tl=JavaScript"),
];

pub fn install_youtube(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command(
        "yt",
        SearchCommand::new(
            "https://www.youtube.com/results?search_query={q}",
            "https://www.youtube.com/",
        ),
    )?;
    Ok(())
}

pub fn install_twitch(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command(
        "tw",
        SearchCommand::new("https://www.twitch.tv/search?term={q}", TWITCH),
    )?;
    module.register_command("twac", TwitchChannelCommand)?;
    module.register_command("twcat", TwitchCategoryCommand)?;
    module.register_command("twcat-all", TwitchCategoriesCommand)?;
    Ok(())
}

pub struct TwitchChannelCommand;

#[async_trait(?Send)]
impl CommandHandler for TwitchChannelCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        if rest.is_empty() {
            session.out("You need to specify a name.");
            return Ok(());
        }
        goto(session, &format!("{TWITCH}{}", encode_uri_component(rest)));
        Ok(())
    }
}

pub struct TwitchCategoryCommand;

impl TwitchCategoryCommand {
    pub fn url(rest: &str) -> String {
        let category = CATEGORY_SHORTCUTS
            .iter()
            .find(|(short, _)| *short == rest)
            .map(|(_, full)| *full)
            .unwrap_or(rest);
        format!("{CATEGORY}{category}")
    }
}

#[async_trait(?Send)]
impl CommandHandler for TwitchCategoryCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        goto(session, &Self::url(rest));
        Ok(())
    }
}

pub struct TwitchCategoriesCommand;

#[async_trait(?Send)]
impl CommandHandler for TwitchCategoriesCommand {
    async fn run(&self, session: &mut Session, _full: &str, _rest: &str) -> Result<(), CommandError> {
        session.out("The following categories are available:");
        for (short, _) in CATEGORY_SHORTCUTS {
            session.out(&format!("- {short}"));
        }
        Ok(())
    }
}
