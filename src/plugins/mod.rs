//! Compiled-in command modules, installed through `builtin:<name>` scripts.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::core::commands::{CommandError, CommandHandler};
use crate::core::registry::{Module, RegistryError, Source};
use crate::core::session::Session;
use crate::io::encode_uri_component;

mod github;
mod google;
mod media;
mod openai;
mod shortlinks;
mod webdev;
mod you;

pub use github::GithubCommand;
pub use media::{TwitchCategoriesCommand, TwitchCategoryCommand, TwitchChannelCommand};
pub use openai::ChatGptCommand;
pub use shortlinks::{ShortenCommand, ShortenResponse};

/// Binds a plugin's handlers onto its freshly registered module.
pub type PluginInstaller = fn(&mut Module) -> Result<(), RegistryError>;

/// Id of the bundled catalog.
pub const BUILTIN_SOURCE: &str = "main";

/// Installed on first start.
pub const DEFAULT_MODULES: &[&str] = &[
    "main:github",
    "main:you",
    "main:google",
    "main:openai",
    "main:shortlinks",
    "main:youtube",
    "main:twitch",
    "main:webdev",
];

const BUILTIN_REPO: &str = include_str!("../../assets/builtin_repo.json");

pub fn builtin_source() -> Result<Source, serde_json::Error> {
    Source::from_json(BUILTIN_REPO)
}

pub fn catalog() -> BTreeMap<&'static str, PluginInstaller> {
    let plugins: [(&'static str, PluginInstaller); 8] = [
        ("github", github::install),
        ("google", google::install),
        ("openai", openai::install),
        ("shortlinks", shortlinks::install),
        ("twitch", media::install_twitch),
        ("webdev", webdev::install),
        ("you", you::install),
        ("youtube", media::install_youtube),
    ];
    plugins.into_iter().collect()
}

/// Navigates to `query` with `{q}` replaced by the encoded argument, or to
/// `home` when there is no argument.
#[derive(Debug, Clone, Copy)]
pub struct SearchCommand {
    query: &'static str,
    home: &'static str,
}

impl SearchCommand {
    pub const fn new(query: &'static str, home: &'static str) -> Self {
        Self { query, home }
    }

    /// A fixed target that ignores its argument.
    pub const fn fixed(url: &'static str) -> Self {
        Self {
            query: url,
            home: url,
        }
    }

    pub fn url(&self, rest: &str) -> String {
        if rest.is_empty() {
            self.home.to_string()
        } else {
            self.query.replace("{q}", &encode_uri_component(rest))
        }
    }
}

#[async_trait(?Send)]
impl CommandHandler for SearchCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let url = self.url(rest);
        goto(session, &url);
        Ok(())
    }
}

pub(crate) fn goto(session: &mut Session, url: &str) {
    session.web.goto(url);
    session.out("Please wait...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::BUNDLED_SCRIPT;
    use crate::core::testing::TestSession;

    #[test]
    fn test_catalog_matches_bundled_source() {
        let source = builtin_source().unwrap();
        let catalog = catalog();

        assert_eq!(source.id, BUILTIN_SOURCE);
        for (id, module) in &source.modules {
            assert_eq!(module.script, format!("builtin:{id}"));
            assert_ne!(module.script, BUNDLED_SCRIPT);
            assert!(catalog.contains_key(id.as_str()), "no plugin for {id}");
        }
        for id in DEFAULT_MODULES {
            let module = id.strip_prefix("main:").unwrap();
            assert!(source.has_module(module));
        }
    }

    #[tokio::test]
    async fn test_default_modules_bind_every_advertised_command() {
        let ids: Vec<&str> = DEFAULT_MODULES.to_vec();
        let harness = TestSession::with_modules(&ids).await;

        for module in harness.session.registry.installed() {
            let unbound: Vec<&str> = module.unbound_commands().map(|c| c.id()).collect();
            assert!(unbound.is_empty(), "{} leaves {:?} unbound", module.id(), unbound);
        }
    }

    #[test]
    fn test_search_url() {
        let search = SearchCommand::new("https://s.example/?q={q}", "https://s.example/");
        assert_eq!(search.url(""), "https://s.example/");
        assert_eq!(search.url("a b&c"), "https://s.example/?q=a%20b%26c");

        let fixed = SearchCommand::fixed("https://pen.new/");
        assert_eq!(fixed.url("ignored"), "https://pen.new/");
    }
}
