//! Sources of installable modules and the set of installed modules.
//!
//! Modules are addressed either bare (`you`) or qualified by the source they
//! come from (`main:you`). A bare id must be unambiguous across every loaded
//! source.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

mod module;
mod resolver;
mod source;

pub use module::{Command, Module};
pub use resolver::{CommandResolver, ResolveError, ResolvedCommand};
pub use source::{CommandDescriptor, ModuleDescriptor, Source, BUNDLED_SCRIPT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("module not found: {0}")]
    ModuleNotFound(String),
    #[error("module {module} found in multiple repos: {}", .sources.join(", "))]
    AmbiguousModule { module: String, sources: Vec<String> },
    #[error("module already installed: {0}")]
    AlreadyInstalled(String),
    #[error("repo already loaded: {0}")]
    SourceAlreadyLoaded(String),
    #[error("repo not found: {0}")]
    SourceNotFound(String),
    #[error("invalid id: {0:?}")]
    InvalidId(String),
}

/// A parsed module address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRef {
    Bare(String),
    Qualified { source: String, module: String },
}

impl ModuleRef {
    pub fn parse(id: &str) -> Result<Self, RegistryError> {
        let invalid = || RegistryError::InvalidId(id.to_string());
        let parts: Vec<&str> = id.split(':').collect();
        match parts.as_slice() {
            [module] if !module.is_empty() => Ok(ModuleRef::Bare(module.to_string())),
            [source, module] if !source.is_empty() && !module.is_empty() => {
                Ok(ModuleRef::Qualified {
                    source: source.to_string(),
                    module: module.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    pub fn module(&self) -> &str {
        match self {
            ModuleRef::Bare(module) => module,
            ModuleRef::Qualified { module, .. } => module,
        }
    }

    /// Whether `installed` is the module this address names.
    pub fn matches(&self, installed: &Module) -> bool {
        match self {
            ModuleRef::Bare(module) => installed.id() == module,
            ModuleRef::Qualified { source, module } => {
                installed.id() == module && installed.source_id() == source
            }
        }
    }
}

/// Where an installable module was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedModule {
    pub source_id: String,
    pub module_id: String,
    pub script: String,
}

impl LocatedModule {
    pub fn qualified_id(&self) -> String {
        format!("{}:{}", self.source_id, self.module_id)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    sources: BTreeMap<String, Source>,
    installed: Vec<Module>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog. An id collision leaves the loaded catalog untouched.
    pub fn add_source(&mut self, source: Source) -> Result<(), RegistryError> {
        if self.sources.contains_key(&source.id) {
            return Err(RegistryError::SourceAlreadyLoaded(source.id));
        }
        info!(source = %source.id, modules = source.modules.len(), "repo loaded");
        self.sources.insert(source.id.clone(), source);
        Ok(())
    }

    pub fn remove_source(&mut self, id: &str) -> Option<Source> {
        self.sources.remove(id)
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    pub fn installed(&self) -> &[Module] {
        &self.installed
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.installed.iter().find(|m| m.id() == id)
    }

    pub fn module_mut(&mut self, id: &str) -> Option<&mut Module> {
        self.installed.iter_mut().find(|m| m.id() == id)
    }

    /// The installed module `id` addresses. A qualified id must match the
    /// module's source as well.
    pub fn find_installed(&self, id: &str) -> Result<Option<&Module>, RegistryError> {
        let module_ref = ModuleRef::parse(id)?;
        Ok(self.installed.iter().find(|m| module_ref.matches(m)))
    }

    pub fn is_installed(&self, id: &str) -> bool {
        self.module(id).is_some()
    }

    pub fn resolver(&self) -> CommandResolver<'_> {
        CommandResolver::new(self)
    }

    /// Finds the catalog entry for an installable module id.
    pub fn locate(&self, id: &str) -> Result<LocatedModule, RegistryError> {
        match ModuleRef::parse(id)? {
            ModuleRef::Bare(module) => {
                if self.is_installed(&module) {
                    return Err(RegistryError::AlreadyInstalled(module));
                }
                let found: Vec<(&str, &ModuleDescriptor)> = self
                    .sources
                    .values()
                    .filter_map(|s| s.modules.get(&module).map(|d| (s.id.as_str(), d)))
                    .collect();
                match found.as_slice() {
                    [] => Err(RegistryError::ModuleNotFound(module)),
                    [(source_id, descriptor)] => Ok(LocatedModule {
                        source_id: source_id.to_string(),
                        module_id: module,
                        script: descriptor.script.clone(),
                    }),
                    many => Err(RegistryError::AmbiguousModule {
                        module,
                        sources: many.iter().map(|(s, _)| s.to_string()).collect(),
                    }),
                }
            }
            ModuleRef::Qualified { source, module } => {
                let repo = self
                    .sources
                    .get(&source)
                    .ok_or_else(|| RegistryError::SourceNotFound(source.clone()))?;
                let descriptor = repo
                    .modules
                    .get(&module)
                    .ok_or_else(|| RegistryError::ModuleNotFound(id.to_string()))?;
                if self.is_installed(&module) {
                    return Err(RegistryError::AlreadyInstalled(module));
                }
                Ok(LocatedModule {
                    source_id: source,
                    module_id: module,
                    script: descriptor.script.clone(),
                })
            }
        }
    }

    /// Installs the module described by `id` and hands it back so a script
    /// can bind its handlers.
    pub fn register(&mut self, id: &str) -> Result<&mut Module, RegistryError> {
        let located = self.locate(id)?;
        let descriptor = self
            .sources
            .get(&located.source_id)
            .and_then(|s| s.modules.get(&located.module_id))
            .ok_or_else(|| RegistryError::ModuleNotFound(id.to_string()))?;

        let module = Module::from_descriptor(&located.module_id, &located.source_id, descriptor);
        debug!(module = %located.qualified_id(), "module registered");

        let index = self.installed.len();
        self.installed.push(module);
        Ok(&mut self.installed[index])
    }

    /// Removes an installed module. Accepts bare or qualified ids.
    pub fn uninstall(&mut self, id: &str) -> Result<Module, RegistryError> {
        let module_ref = ModuleRef::parse(id)?;
        let index = self
            .installed
            .iter()
            .position(|m| module_ref.matches(m))
            .ok_or_else(|| RegistryError::ModuleNotFound(id.to_string()))?;
        info!(module = id, "module uninstalled");
        Ok(self.installed.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, modules: &[&str]) -> Source {
        let modules = modules
            .iter()
            .map(|m| format!(r#""{m}": {{"name": "{m}", "script": "builtin:{m}", "commands": {{"{m}-cmd": {{}}}}}}"#))
            .collect::<Vec<_>>()
            .join(",");
        Source::from_json(&format!(r#"{{"id": "{id}", "name": "{id}", "modules": {{{modules}}}}}"#))
            .unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.add_source(source("repo1", &["mod", "solo"])).unwrap();
        registry.add_source(source("repo2", &["mod", "other"])).unwrap();
        registry
    }

    #[test]
    fn test_module_ref_parse() {
        assert_eq!(ModuleRef::parse("you"), Ok(ModuleRef::Bare("you".into())));
        assert_eq!(
            ModuleRef::parse("main:you"),
            Ok(ModuleRef::Qualified {
                source: "main".into(),
                module: "you".into()
            })
        );
        for bad in ["", "a:b:c", ":you", "main:"] {
            assert_eq!(
                ModuleRef::parse(bad),
                Err(RegistryError::InvalidId(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_locate_bare_and_qualified() {
        let registry = registry();

        let located = registry.locate("solo").unwrap();
        assert_eq!(located.qualified_id(), "repo1:solo");
        assert_eq!(located.script, "builtin:solo");

        let located = registry.locate("repo2:mod").unwrap();
        assert_eq!(located.source_id, "repo2");
    }

    #[test]
    fn test_locate_errors() {
        let registry = registry();
        assert_eq!(
            registry.locate("mod"),
            Err(RegistryError::AmbiguousModule {
                module: "mod".into(),
                sources: vec!["repo1".into(), "repo2".into()]
            })
        );
        assert_eq!(
            registry.locate("missing"),
            Err(RegistryError::ModuleNotFound("missing".into()))
        );
        assert_eq!(
            registry.locate("repo3:mod"),
            Err(RegistryError::SourceNotFound("repo3".into()))
        );
        assert_eq!(
            registry.locate("repo1:other"),
            Err(RegistryError::ModuleNotFound("repo1:other".into()))
        );
    }

    #[test]
    fn test_register_builds_module_from_descriptor() -> Result<(), RegistryError> {
        let mut registry = registry();
        let module = registry.register("repo1:solo")?;
        assert_eq!(module.qualified_id(), "repo1:solo");
        assert!(module.has_command("solo-cmd"));
        assert!(registry.is_installed("solo"));
        Ok(())
    }

    #[test]
    fn test_already_installed_from_other_repo() -> Result<(), RegistryError> {
        let mut registry = registry();
        registry.register("repo2:mod")?;

        assert_eq!(
            registry.register("repo1:mod").map(|m| m.id().to_string()),
            Err(RegistryError::AlreadyInstalled("mod".into()))
        );
        assert_eq!(registry.installed().len(), 1);
        assert_eq!(registry.installed()[0].source_id(), "repo2");
        Ok(())
    }

    #[test]
    fn test_source_collision_keeps_original() {
        let mut registry = registry();
        let result = registry.add_source(source("repo1", &["replacement"]));

        assert_eq!(result, Err(RegistryError::SourceAlreadyLoaded("repo1".into())));
        let original = registry.source("repo1").unwrap();
        assert!(original.has_module("mod"));
        assert!(!original.has_module("replacement"));
    }

    #[test]
    fn test_uninstall() -> Result<(), RegistryError> {
        let mut registry = registry();
        registry.register("solo")?;
        registry.register("repo1:mod")?;

        assert!(registry.uninstall("repo2:mod").is_err());
        assert_eq!(registry.uninstall("repo1:mod")?.id(), "mod");
        assert_eq!(registry.uninstall("solo")?.id(), "solo");
        assert!(registry.installed().is_empty());
        assert_eq!(
            registry.uninstall("solo").map(|m| m.id().to_string()),
            Err(RegistryError::ModuleNotFound("solo".into()))
        );
        Ok(())
    }

    #[test]
    fn test_find_installed() -> Result<(), RegistryError> {
        let mut registry = registry();
        registry.register("repo1:mod")?;

        assert_eq!(registry.find_installed("mod")?.map(|m| m.source_id()), Some("repo1"));
        assert!(registry.find_installed("repo1:mod")?.is_some());
        assert!(registry.find_installed("repo2:mod")?.is_none());
        assert!(registry.find_installed("solo")?.is_none());
        assert!(registry.find_installed("a:b:c").is_err());
        Ok(())
    }
}
