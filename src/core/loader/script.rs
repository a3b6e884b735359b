//! Declarative module scripts.
//!
//! A script binds command ids to command lines that are dispatched again when
//! the command runs:
//!
//! ```text
//! # weather.gterm
//! module extra:weather
//! command forecast = open https://wttr.in/{rest:url}
//! empty forecast = open https://wttr.in/
//! describe forecast = Show the forecast
//! alias forecast = fc wttr
//! command rain = forecast {rest} && copy {rest}
//! ```
//!
//! `{rest}` expands to the text after the command token, `{rest:url}` to the
//! same text percent-encoded. ` && ` runs several lines in order and stops at
//! the first one that does not execute.

use async_trait::async_trait;
use tracing::debug;

use super::LoadError;
use crate::core::commands::{CommandError, CommandHandler};
use crate::core::dispatcher::DispatchOutcome;
use crate::core::registry::{LocatedModule, Registry, RegistryError};
use crate::core::session::Session;
use crate::io::encode_uri_component;

const CHAIN: &str = " && ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptCommand {
    pub id: String,
    pub line: Option<String>,
    pub empty: Option<String>,
    pub description: Option<String>,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub module: Option<String>,
    pub commands: Vec<ScriptCommand>,
}

impl Script {
    pub fn parse(origin: &str, text: &str) -> Result<Self, LoadError> {
        let mut script = Script::default();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let error = |reason: &str| LoadError::Script {
                origin: origin.to_string(),
                line: index + 1,
                reason: reason.to_string(),
            };

            let (directive, body) = line.split_once(' ').unwrap_or((line, ""));
            let body = body.trim();

            if directive == "module" {
                if body.is_empty() || body.contains(char::is_whitespace) {
                    return Err(error("expected `module <id>`"));
                }
                if script.module.is_some() {
                    return Err(error("module declared twice"));
                }
                script.module = Some(body.to_string());
                continue;
            }

            let Some((id, value)) = body.split_once('=') else {
                return Err(error(&format!("expected `{directive} <id> = <value>`")));
            };
            let id = id.trim();
            let value = value.trim();
            if id.is_empty() || id.contains(char::is_whitespace) || id.contains(':') {
                return Err(error(&format!("invalid command id {id:?}")));
            }

            let entry = script.entry(id);
            match directive {
                "command" => entry.line = Some(value.to_string()),
                "empty" => entry.empty = Some(value.to_string()),
                "describe" => entry.description = Some(value.to_string()),
                "alias" => entry
                    .aliases
                    .extend(value.split_whitespace().map(str::to_string)),
                other => return Err(error(&format!("unknown directive {other:?}"))),
            }
        }

        if let Some(command) = script
            .commands
            .iter()
            .find(|c| c.line.is_none() && c.empty.is_none())
        {
            return Err(LoadError::Script {
                origin: origin.to_string(),
                line: 0,
                reason: format!("command {} has no command line", command.id),
            });
        }
        Ok(script)
    }

    fn entry(&mut self, id: &str) -> &mut ScriptCommand {
        let index = match self.commands.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => {
                self.commands.push(ScriptCommand {
                    id: id.to_string(),
                    ..Default::default()
                });
                self.commands.len() - 1
            }
        };
        &mut self.commands[index]
    }

    /// Binds the script's commands. With no `target`, the script's own
    /// `module` directive decides which module gets registered, or reused
    /// when it is already installed.
    pub fn apply(
        &self,
        origin: &str,
        registry: &mut Registry,
        target: Option<&LocatedModule>,
    ) -> Result<String, LoadError> {
        let module_id = match (target, &self.module) {
            (Some(target), Some(declared))
                if *declared != target.module_id && *declared != target.qualified_id() =>
            {
                return Err(LoadError::Script {
                    origin: origin.to_string(),
                    line: 0,
                    reason: format!(
                        "declares module {declared}, expected {}",
                        target.qualified_id()
                    ),
                });
            }
            (Some(target), _) => target.module_id.clone(),
            (None, Some(declared)) => match registry.find_installed(declared)? {
                // Loading again rebinds onto the module already there.
                Some(module) => module.id().to_string(),
                None => registry.register(declared)?.id().to_string(),
            },
            (None, None) => return Err(LoadError::MissingModule(origin.to_string())),
        };

        let module = registry
            .module_mut(&module_id)
            .ok_or_else(|| RegistryError::ModuleNotFound(module_id.clone()))?;
        for command in &self.commands {
            let bound = module.register_command(
                &command.id,
                TemplateCommand {
                    line: command.line.clone(),
                    empty: command.empty.clone(),
                },
            )?;
            if let Some(description) = &command.description {
                bound.set_description(description);
            }
            for alias in &command.aliases {
                bound.add_alias(alias);
            }
        }
        debug!(module = %module_id, commands = self.commands.len(), origin, "script applied");
        Ok(module_id)
    }
}

/// Expands `{rest}` and `{rest:url}` in one command line.
pub fn expand(template: &str, rest: &str) -> String {
    template
        .replace("{rest:url}", &encode_uri_component(rest))
        .replace("{rest}", rest)
}

/// Re-dispatches the command lines a script bound to a command id.
#[derive(Debug, Clone)]
pub struct TemplateCommand {
    line: Option<String>,
    empty: Option<String>,
}

impl TemplateCommand {
    fn template(&self, rest: &str) -> Option<&str> {
        let (first, second) = if rest.is_empty() {
            (&self.empty, &self.line)
        } else {
            (&self.line, &self.empty)
        };
        first.as_deref().or(second.as_deref())
    }
}

#[async_trait(?Send)]
impl CommandHandler for TemplateCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let Some(template) = self.template(rest) else {
            return Ok(());
        };
        // Split before expanding so user text cannot add steps.
        for part in template.split(CHAIN) {
            let line = expand(part.trim(), rest);
            match session.dispatch(&line).await {
                DispatchOutcome::Executed | DispatchOutcome::Empty => {}
                outcome => {
                    debug!(?outcome, line, "command chain stopped");
                    return Err(CommandError::ExecutionError(format!("stopped at `{line}`")));
                }
            }
        }
        Ok(())
    }
}
