use std::collections::{BTreeMap, BTreeSet};

use rustyline::completion::Pair;

use crate::core::registry::Registry;

const MODULES_SUBCOMMANDS: &[&str] = &[
    "add-repo",
    "install",
    "list",
    "remove",
    "remove-repo",
    "tmpinstall",
];

/// Completion candidates snapshotted from the registry.
#[derive(Clone, Default)]
pub struct CommandCompleter {
    commands: BTreeMap<String, String>,
    aliases: BTreeMap<String, String>,
    installable: BTreeSet<String>,
    installed: BTreeSet<String>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, registry: &Registry) {
        self.commands.clear();
        self.aliases.clear();
        self.installable.clear();
        self.installed.clear();

        for module in registry.installed() {
            self.installed.insert(module.id().to_string());
            for command in module.commands() {
                self.commands
                    .insert(command.id().to_string(), command.description().to_string());
                for alias in command.aliases() {
                    self.aliases
                        .insert(alias.to_string(), command.id().to_string());
                }
            }
        }
        for source in registry.sources() {
            for id in source.modules.keys() {
                if !registry.is_installed(id) {
                    self.installable.insert(format!("{}:{}", source.id, id));
                }
            }
        }
    }

    /// True for command ids, aliases and `module:command` forms.
    pub fn is_known(&self, token: &str) -> bool {
        if let Some((module, command)) = token.split_once(':') {
            return self.installed.contains(module)
                && (self.commands.contains_key(command) || self.aliases.contains_key(command));
        }
        self.commands.contains_key(token) || self.aliases.contains_key(token)
    }

    pub fn complete_command(&self, word: &str) -> Vec<Pair> {
        let mut matches: Vec<Pair> = self
            .commands
            .keys()
            .filter(|id| id.starts_with(word))
            .map(|id| Pair {
                display: id.clone(),
                replacement: id.clone(),
            })
            .collect();

        for (alias, target) in &self.aliases {
            if alias.starts_with(word) && !self.commands.contains_key(alias) {
                matches.push(Pair {
                    display: format!("{alias} ({target})"),
                    replacement: alias.clone(),
                });
            }
        }
        matches
    }

    /// Arguments for `modules`; nothing for other commands.
    pub fn complete_argument(&self, words: &[&str]) -> Vec<Pair> {
        let candidates: Vec<&str> = match words {
            ["modules", word] => MODULES_SUBCOMMANDS
                .iter()
                .copied()
                .filter(|s| s.starts_with(*word))
                .collect(),
            ["modules", "install", word] => self
                .installable
                .iter()
                .map(String::as_str)
                .filter(|id| id.starts_with(*word))
                .collect(),
            ["modules", "remove", word] => self
                .installed
                .iter()
                .map(String::as_str)
                .filter(|id| id.starts_with(*word))
                .collect(),
            _ => Vec::new(),
        };

        candidates
            .into_iter()
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c.to_string(),
            })
            .collect()
    }
}
