use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::goto;
use crate::core::commands::{CommandError, CommandHandler};
use crate::core::registry::{Module, RegistryError};
use crate::core::session::Session;
use crate::io::{encode_uri_component, Style};

/// Body of `create.php?format=json` on is.gd and v.gd.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortenResponse {
    #[serde(default)]
    pub shorturl: Option<String>,
    #[serde(default)]
    pub errormessage: Option<String>,
}

/// `short <url>`: shortens the link, prints it and copies it.
#[derive(Debug, Clone)]
pub struct ShortenCommand {
    api: String,
    home: String,
}

impl ShortenCommand {
    pub fn new(api: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            home: home.into(),
        }
    }

    pub fn request_url(&self, link: &str) -> String {
        format!("{}?format=json&url={}", self.api, encode_uri_component(link))
    }
}

#[async_trait(?Send)]
impl CommandHandler for ShortenCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let link = rest.trim();
        if link.is_empty() {
            goto(session, &self.home);
            return Ok(());
        }

        let response: ShortenResponse = session
            .loader
            .fetcher()
            .json(&self.request_url(link))
            .await?;
        debug!(?response, "shortener replied");

        if let Some(message) = response.errormessage {
            session.println(&format!("Failed: {message}"), Style::Error);
            return Ok(());
        }
        let short = response
            .shorturl
            .ok_or_else(|| CommandError::ExecutionError("shortener returned no link".to_string()))?;

        session.out(&format!("The link is: {short}"));
        session.copy(&short);
        Ok(())
    }
}

pub fn install(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command(
        "short",
        ShortenCommand::new("https://is.gd/create.php", "https://is.gd/"),
    )?;
    module.register_command(
        "shortv",
        ShortenCommand::new("https://v.gd/create.php", "https://v.gd/"),
    )?;
    Ok(())
}
