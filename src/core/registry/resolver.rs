use thiserror::Error;
use tracing::trace;

use super::{Command, Registry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error("command {token} is ambiguous: {}", .candidates.join(", "))]
    AmbiguousCommand {
        token: String,
        candidates: Vec<String>,
    },
}

/// A command together with the module it was found in.
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub module_id: String,
    pub command: Command,
}

impl ResolvedCommand {
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.module_id, self.command.id())
    }
}

pub struct CommandResolver<'a> {
    registry: &'a Registry,
}

impl<'a> CommandResolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Every command whose id or alias matches `token`.
    ///
    /// `module:command` restricts the search to one module. Bare tokens scan
    /// the installed modules in installation order; each module contributes
    /// at most one command.
    pub fn find(&self, token: &str) -> Vec<ResolvedCommand> {
        if token.is_empty() {
            return Vec::new();
        }

        if let Some((module_id, command_id)) = token.split_once(':') {
            return self
                .registry
                .module(module_id)
                .and_then(|module| module.command(command_id))
                .map(|command| ResolvedCommand {
                    module_id: module_id.to_string(),
                    command: command.clone(),
                })
                .into_iter()
                .collect();
        }

        let matches: Vec<ResolvedCommand> = self
            .registry
            .installed()
            .iter()
            .filter_map(|module| {
                module.command(token).map(|command| ResolvedCommand {
                    module_id: module.id().to_string(),
                    command: command.clone(),
                })
            })
            .collect();
        trace!(token, matches = matches.len(), "resolved");
        matches
    }

    pub fn resolve_unique(&self, token: &str) -> Result<ResolvedCommand, ResolveError> {
        let mut matches = self.find(token);
        match matches.len() {
            0 => Err(ResolveError::CommandNotFound(token.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(ResolveError::AmbiguousCommand {
                token: token.to_string(),
                candidates: matches.iter().map(ResolvedCommand::qualified_name).collect(),
            }),
        }
    }

    /// The most recently installed module's command with exactly this id.
    pub fn find_latest(&self, id: &str) -> Option<ResolvedCommand> {
        self.registry.installed().iter().rev().find_map(|module| {
            module
                .commands()
                .iter()
                .find(|c| c.id() == id)
                .map(|command| ResolvedCommand {
                    module_id: module.id().to_string(),
                    command: command.clone(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Source;

    const REPO: &str = r#"{
        "id": "main",
        "name": "Main",
        "modules": {
            "you": {"name": "You", "commands": {
                "you": {"description": "search", "aliases": ["u", "you"]},
                "chat": {"description": "chat"},
                "command_not_found": {}
            }},
            "google": {"name": "Google", "commands": {
                "google": {"description": "google", "aliases": ["goog"]},
                "chat": {"description": "bard"},
                "command_not_found": {}
            }},
            "webdev": {"name": "WebDev", "commands": {
                "pen": {"description": "codepen", "aliases": ["chat"]}
            }}
        }
    }"#;

    fn registry(install: &[&str]) -> Registry {
        let mut registry = Registry::new();
        registry.add_source(Source::from_json(REPO).unwrap()).unwrap();
        for id in install {
            registry.register(id).unwrap();
        }
        registry
    }

    fn names(matches: &[ResolvedCommand]) -> Vec<String> {
        matches.iter().map(ResolvedCommand::qualified_name).collect()
    }

    #[test]
    fn test_single_match_by_alias() {
        let registry = registry(&["you", "google"]);
        assert_eq!(names(&registry.resolver().find("u")), vec!["you:you"]);
        assert_eq!(names(&registry.resolver().find("goog")), vec!["google:google"]);
    }

    #[test]
    fn test_alias_equal_to_id_is_not_duplicated() {
        let registry = registry(&["you"]);
        assert_eq!(registry.resolver().find("you").len(), 1);
    }

    #[test]
    fn test_bare_token_in_many_modules_follows_install_order() {
        let registry = registry(&["webdev", "google", "you"]);
        assert_eq!(
            names(&registry.resolver().find("chat")),
            vec!["webdev:pen", "google:chat", "you:chat"]
        );
    }

    #[test]
    fn test_qualified_lookup_stays_in_module() {
        let registry = registry(&["you", "google"]);
        assert_eq!(names(&registry.resolver().find("google:chat")), vec!["google:chat"]);
        assert_eq!(names(&registry.resolver().find("you:chat")), vec!["you:chat"]);
        assert!(registry.resolver().find("you:goog").is_empty());
        assert!(registry.resolver().find("webdev:chat").is_empty());
        assert!(registry.resolver().find("missing:chat").is_empty());
    }

    #[test]
    fn test_empty_and_unknown_tokens() {
        let registry = registry(&["you"]);
        assert!(registry.resolver().find("").is_empty());
        assert!(registry.resolver().find("xyzzy").is_empty());
    }

    #[test]
    fn test_resolve_unique_errors() {
        let registry = registry(&["you", "google"]);
        assert_eq!(
            registry.resolver().resolve_unique("nope").map(|r| r.qualified_name()),
            Err(ResolveError::CommandNotFound("nope".into()))
        );
        assert_eq!(
            registry.resolver().resolve_unique("chat").map(|r| r.qualified_name()),
            Err(ResolveError::AmbiguousCommand {
                token: "chat".into(),
                candidates: vec!["you:chat".into(), "google:chat".into()]
            })
        );
    }

    #[test]
    fn test_find_latest_prefers_last_installed() {
        let registry = registry(&["google", "you"]);
        let found = registry.resolver().find_latest("command_not_found").unwrap();
        assert_eq!(found.module_id, "you");
        assert!(registry.resolver().find_latest("u").is_none());
    }
}
