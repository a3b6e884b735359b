use async_trait::async_trait;

use super::goto;
use crate::core::commands::{CommandError, CommandHandler};
use crate::core::registry::{Module, RegistryError};
use crate::core::session::Session;
use crate::io::encode_uri_component;

/// `gh [owner[/repo]]` and `gist [owner[/id]]`.
#[derive(Debug, Clone, Copy)]
pub struct GithubCommand {
    host: &'static str,
}

impl GithubCommand {
    pub const fn new(host: &'static str) -> Self {
        Self { host }
    }

    pub fn url(&self, rest: &str) -> String {
        let mut parts = rest.trim().splitn(2, '/');
        let owner = parts.next().unwrap_or_default();
        let item = parts.next().unwrap_or_default().trim_matches('/');

        match (owner.is_empty(), item.is_empty()) {
            (true, _) => format!("https://{}/", self.host),
            (false, true) => format!("https://{}/{}", self.host, encode_uri_component(owner)),
            (false, false) => format!(
                "https://{}/{}/{}",
                self.host,
                encode_uri_component(owner),
                encode_uri_component(item)
            ),
        }
    }
}

#[async_trait(?Send)]
impl CommandHandler for GithubCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let url = self.url(rest);
        goto(session, &url);
        Ok(())
    }
}

pub fn install(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command("gh", GithubCommand::new("github.com"))?;
    module.register_command("gist", GithubCommand::new("gist.github.com"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let gh = GithubCommand::new("github.com");
        assert_eq!(gh.url(""), "https://github.com/");
        assert_eq!(gh.url("rust-lang"), "https://github.com/rust-lang");
        assert_eq!(gh.url("rust-lang/rust"), "https://github.com/rust-lang/rust");
        assert_eq!(gh.url("rust-lang/"), "https://github.com/rust-lang");
        assert_eq!(gh.url("/rust"), "https://github.com/");

        let gist = GithubCommand::new("gist.github.com");
        assert_eq!(gist.url("octocat/abc123"), "https://gist.github.com/octocat/abc123");
    }
}
