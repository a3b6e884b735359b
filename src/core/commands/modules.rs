use async_trait::async_trait;
use tracing::debug;

use super::{CommandError, CommandHandler};
use crate::core::config::ADDED_REPOS;
use crate::core::session::Session;

/// `modules install|tmpinstall|add-repo|remove-repo|remove|list`
pub struct ModulesCommand;

fn argument<'a>(subcommand: &str, arg: &'a str, what: &str) -> Result<&'a str, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "usage: modules {subcommand} <{what}>"
        )));
    }
    Ok(arg)
}

impl ModulesCommand {
    fn list(session: &mut Session) {
        let modules: Vec<String> = session
            .registry
            .installed()
            .iter()
            .map(|m| format!("- {} [{}]", m.name(), m.qualified_id()))
            .collect();
        let repos: Vec<String> = session
            .registry
            .sources()
            .map(|s| match &s.url {
                Some(url) => format!("- {} [{}] {}", s.name, s.id, url),
                None => format!("- {} [{}]", s.name, s.id),
            })
            .collect();

        session.out("Installed modules:");
        if modules.is_empty() {
            session.out("No modules installed.");
        }
        for line in &modules {
            session.out(line);
        }

        session.out("Added repos:");
        if repos.is_empty() {
            session.out("No repos added.");
        }
        for line in &repos {
            session.out(line);
        }
    }
}

#[async_trait(?Send)]
impl CommandHandler for ModulesCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let (subcommand, arg) = rest.split_once(' ').unwrap_or((rest, ""));

        match subcommand {
            "install" => {
                let id = argument(subcommand, arg, "module")?;
                session.install_module(id).await?;
                session.out("Module was added.");
            }
            "tmpinstall" => {
                let url = argument(subcommand, arg, "script")?;
                session
                    .loader
                    .load_source_file(&mut session.registry, url)
                    .await?;
                session.out("File was added for this session.");
            }
            "add-repo" => {
                let url = argument(subcommand, arg, "url")?;
                session.load_source(url).await?;
                session.config.add_to_list(ADDED_REPOS, url)?;
                session.config.save()?;
                session.out("Repo was added.");
            }
            "remove-repo" => {
                let url = argument(subcommand, arg, "url")?;
                session.config.remove_from_list(ADDED_REPOS, url)?;
                session.config.save()?;
                session.out("Repo was removed.");
            }
            "remove" => {
                let id = argument(subcommand, arg, "module")?;
                session.uninstall_module(id)?;
                session.out("Module was removed.");
            }
            "list" => Self::list(session),
            other => debug!(subcommand = other, "ignoring unknown modules subcommand"),
        }
        Ok(())
    }
}
