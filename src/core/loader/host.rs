use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::fetch::Fetcher;
use super::script::Script;
use super::{LoadError, ScriptHost};
use crate::core::registry::{LocatedModule, Registry, RegistryError, BUNDLED_SCRIPT};
use crate::plugins::{self, PluginInstaller};

const BUILTIN_PREFIX: &str = "builtin:";

/// Runs module scripts: compiled-in plugins, bundled modules and declarative
/// scripts fetched over HTTP or read from disk.
pub struct PluginHost {
    fetcher: Fetcher,
    plugins: BTreeMap<&'static str, PluginInstaller>,
}

impl PluginHost {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            plugins: plugins::catalog(),
        }
    }

    pub fn plugin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.keys().copied()
    }

    fn install_plugin(
        &self,
        registry: &mut Registry,
        name: &str,
        module_id: &str,
    ) -> Result<(), LoadError> {
        let install = self
            .plugins
            .get(name)
            .ok_or_else(|| LoadError::UnknownPlugin(name.to_string()))?;
        let module = registry
            .module_mut(module_id)
            .ok_or_else(|| RegistryError::ModuleNotFound(module_id.to_string()))?;
        install(module)?;
        debug!(plugin = name, module = module_id, "plugin installed");
        Ok(())
    }

    async fn read_script(&self, script: &str) -> Result<String, LoadError> {
        if script.starts_with("http://") || script.starts_with("https://") {
            return self.fetcher.text(script).await;
        }
        let path = Path::new(script);
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[async_trait(?Send)]
impl ScriptHost for PluginHost {
    async fn execute(
        &self,
        registry: &mut Registry,
        script: &str,
        target: Option<&LocatedModule>,
    ) -> Result<(), LoadError> {
        let script = script.trim();
        if script.is_empty() {
            return Err(LoadError::NoScript);
        }

        if script == BUNDLED_SCRIPT {
            let Some(target) = target else {
                return Err(LoadError::NoScript);
            };
            if self.plugins.contains_key(target.module_id.as_str()) {
                return self.install_plugin(registry, &target.module_id, &target.module_id);
            }
            warn!(module = %target.qualified_id(), "bundled module has no compiled-in handlers");
            return Ok(());
        }

        if let Some(name) = script.strip_prefix(BUILTIN_PREFIX) {
            if !self.plugins.contains_key(name) {
                return Err(LoadError::UnknownPlugin(name.to_string()));
            }
            let module_id = match target {
                Some(target) => target.module_id.clone(),
                None => match registry.find_installed(name)? {
                    Some(module) => module.id().to_string(),
                    None => registry.register(name)?.id().to_string(),
                },
            };
            return self.install_plugin(registry, name, &module_id);
        }

        let text = self.read_script(script).await?;
        Script::parse(script, &text)?.apply(script, registry, target)?;
        Ok(())
    }
}
