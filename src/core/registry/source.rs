use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Script marker for modules whose code ships with the host itself.
pub const BUNDLED_SCRIPT: &str = "#";

fn bundled_script() -> String {
    BUNDLED_SCRIPT.to_string()
}

/// A catalog of installable modules, usually fetched as `repo.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleDescriptor>,
    /// Where the catalog was fetched from; `None` for bundled catalogs.
    #[serde(skip)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "bundled_script")]
    pub script: String,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Source {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn has_module(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Rejects catalogs whose ids would break `source:module` addressing.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() || self.id.contains(':') {
            return Err(format!("invalid repo id {:?}", self.id));
        }
        if let Some(bad) = self
            .modules
            .keys()
            .find(|id| id.is_empty() || id.contains(':'))
        {
            return Err(format!("invalid module id {:?} in repo {}", bad, self.id));
        }
        Ok(())
    }
}
