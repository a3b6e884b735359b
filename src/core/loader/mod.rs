//! Fetches module catalogs and runs module scripts.

use std::path::PathBuf;
use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::registry::{LocatedModule, Registry, RegistryError, Source};

mod fetch;
mod host;
mod script;

pub use fetch::Fetcher;
pub use host::PluginHost;
pub use script::{expand, Script, ScriptCommand, TemplateCommand};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid repo {origin}: {reason}")]
    InvalidDescriptor { origin: String, reason: String },
    #[error("{origin}:{line}: {reason}")]
    Script {
        origin: String,
        line: usize,
        reason: String,
    },
    #[error("script {0} does not declare a module")]
    MissingModule(String),
    #[error("module has no script")]
    NoScript,
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Executes a module script against the registry. Once it resolves, the
/// commands the script binds are present in the registry.
#[async_trait(?Send)]
pub trait ScriptHost {
    async fn execute(
        &self,
        registry: &mut Registry,
        script: &str,
        target: Option<&LocatedModule>,
    ) -> Result<(), LoadError>;
}

pub struct ModuleLoader {
    fetcher: Fetcher,
    host: Rc<dyn ScriptHost>,
}

impl ModuleLoader {
    pub fn new() -> Result<Self, LoadError> {
        let fetcher = Fetcher::new()?;
        let host = PluginHost::new(fetcher.clone());
        Ok(Self::with_host(fetcher, host))
    }

    pub fn with_host(fetcher: Fetcher, host: impl ScriptHost + 'static) -> Self {
        Self {
            fetcher,
            host: Rc::new(host),
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// GET and decode a catalog.
    pub async fn fetch_source(&self, url: &str) -> Result<Source, LoadError> {
        let source: Source = self.fetcher.json(url).await?;
        source
            .validate()
            .map_err(|reason| LoadError::InvalidDescriptor {
                origin: url.to_string(),
                reason,
            })?;
        Ok(source.with_url(url))
    }

    /// Fetches a catalog and adds it to `registry`. Returns the catalog id.
    pub async fn load_source(&self, registry: &mut Registry, url: &str) -> Result<String, LoadError> {
        let source = self.fetch_source(url).await?;
        let id = source.id.clone();
        registry.add_source(source)?;
        Ok(id)
    }

    /// Installs a module from a loaded catalog. Nothing is persisted.
    pub async fn load_module(&self, registry: &mut Registry, id: &str) -> Result<(), LoadError> {
        let located = registry.locate(id)?;
        let qualified = located.qualified_id();
        registry.register(&qualified)?;

        if let Err(e) = self
            .host
            .execute(registry, &located.script, Some(&located))
            .await
        {
            debug!(module = %qualified, error = %e, "rolling back failed install");
            registry.uninstall(&qualified).ok();
            return Err(e);
        }

        info!(module = %qualified, "module loaded");
        Ok(())
    }

    /// Runs a script with no catalog entry behind it.
    pub async fn load_source_file(&self, registry: &mut Registry, url: &str) -> Result<(), LoadError> {
        self.host.execute(registry, url, None).await?;
        info!(script = url, "script loaded");
        Ok(())
    }
}
