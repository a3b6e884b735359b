//! Startup sequence: config, core modules, bundled catalog, then every
//! configured repo and module. One bad entry never stops the rest.

use tracing::{error, info};

use crate::core::commands::install_core;
use crate::core::config::{ADDED_REPOS, INSTALLED_MODULES};
use crate::core::loader::LoadError;
use crate::core::session::Session;
use crate::error::ShellError;
use crate::io::Style;
use crate::plugins::{self, DEFAULT_MODULES};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupReport {
    pub config_found: bool,
    pub repos_loaded: usize,
    pub repos_failed: usize,
    pub modules_loaded: usize,
    pub modules_failed: usize,
}

pub async fn bootstrap(session: &mut Session) -> Result<StartupReport, ShellError> {
    let mut report = StartupReport::default();

    // A config that exists but does not parse is never overwritten.
    let writable = match session.config.load() {
        Ok(found) => {
            report.config_found = found;
            if !found {
                session.println("No config found.", Style::Warn);
            }
            true
        }
        Err(e) => {
            session.println(&format!("Failed to load config: {e}"), Style::Error);
            false
        }
    };

    install_core(session)?;
    let builtin = plugins::builtin_source().map_err(|e| LoadError::InvalidDescriptor {
        origin: plugins::BUILTIN_SOURCE.to_string(),
        reason: e.to_string(),
    })?;
    session.registry.add_source(builtin).map_err(LoadError::from)?;

    let repos = configured_list(session, ADDED_REPOS, &[]);
    let modules = configured_list(session, INSTALLED_MODULES, DEFAULT_MODULES);
    if writable {
        if let Err(e) = session.config.save() {
            session.println(&format!("Failed to save config: {e}"), Style::Error);
        }
    }

    for url in &repos {
        match session.load_source(url).await {
            Ok(_) => report.repos_loaded += 1,
            Err(e) => {
                error!(repo = %url, error = %e, "repo failed to load");
                session.println(&format!("Failed to load repo {url}: {e}"), Style::Error);
                report.repos_failed += 1;
            }
        }
    }

    for id in &modules {
        match session.loader.load_module(&mut session.registry, id).await {
            Ok(()) => report.modules_loaded += 1,
            Err(e) => {
                error!(module = %id, error = %e, "module failed to load");
                session.println(&format!("Failed to load module {id}: {e}"), Style::Error);
                report.modules_failed += 1;
            }
        }
    }

    info!(?report, "startup finished");
    Ok(report)
}

/// The stored list, seeded with `defaults` on first start. A value that is
/// not a list is reported and ignored.
fn configured_list(session: &mut Session, key: &str, defaults: &[&str]) -> Vec<String> {
    match session.config.list_or_init(key, defaults) {
        Ok(list) => list,
        Err(e) => {
            session.println(&format!("Ignoring config value {key}: {e}"), Style::Error);
            Vec::new()
        }
    }
}
