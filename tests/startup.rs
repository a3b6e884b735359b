//! First start and recovery from bad configuration.

mod common;

use common::{config_path, load_fixture, read_config, Harness};
use gterm::core::config::{ConfigStore, ADDED_REPOS, INSTALLED_MODULES};
use gterm::io::Style;
use gterm::plugins::DEFAULT_MODULES;
use gterm::shell::startup::{bootstrap, StartupReport};
use mockito::Server;
use tempfile::TempDir;

#[tokio::test]
async fn first_start_installs_defaults() {
    let dir = TempDir::new().unwrap();
    let path = config_path(dir.path());
    let mut harness = Harness::with_config(ConfigStore::new(&path));

    let report = bootstrap(&mut harness.session).await.unwrap();

    assert_eq!(
        report,
        StartupReport {
            config_found: false,
            repos_loaded: 0,
            repos_failed: 0,
            modules_loaded: DEFAULT_MODULES.len(),
            modules_failed: 0,
        }
    );
    assert!(harness.output.has_line("No config found.", Style::Warn));

    let config = read_config(&path);
    assert_eq!(config[ADDED_REPOS], serde_json::json!([]));
    assert_eq!(config[INSTALLED_MODULES], serde_json::json!(DEFAULT_MODULES));

    harness.run("u what is rust").await;
    assert_eq!(
        harness.web.last_url().as_deref(),
        Some("https://you.com/search?q=what%20is%20rust&tbm=youchat&fromExtension=true")
    );
}

#[tokio::test]
async fn bad_entries_do_not_stop_the_rest() {
    let dir = TempDir::new().unwrap();
    let path = config_path(dir.path());
    let mut server = Server::new_async().await;
    let repo = load_fixture("extra_repo.json").replace("{server}", &server.url());
    server
        .mock("GET", "/repo.json")
        .with_status(200)
        .with_body(repo)
        .create_async()
        .await;
    server
        .mock("GET", "/gone.json")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/weather.gterm")
        .with_status(200)
        .with_body(load_fixture("weather.gterm"))
        .create_async()
        .await;

    let gone = format!("{}/gone.json", server.url());
    let stored = serde_json::json!({
        ADDED_REPOS: [gone, format!("{}/repo.json", server.url())],
        INSTALLED_MODULES: ["main:github", "ghost", "extra:weather"],
    });
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, stored.to_string()).unwrap();

    let mut harness = Harness::with_config(ConfigStore::new(&path));
    let report = bootstrap(&mut harness.session).await.unwrap();

    assert!(report.config_found);
    assert_eq!((report.repos_loaded, report.repos_failed), (1, 1));
    assert_eq!((report.modules_loaded, report.modules_failed), (2, 1));
    assert!(harness
        .output
        .contains(&format!("Failed to load repo {gone}: failed to fetch {gone}")));
    assert!(harness.output.has_line(
        "Failed to load module ghost: module not found: ghost",
        Style::Error
    ));

    let registry = &harness.session.registry;
    assert!(registry.is_installed("github"));
    assert!(registry.is_installed("weather"));
    assert!(registry.is_installed("main"));

    // Failed entries stay configured for the next start.
    assert_eq!(read_config(&path), stored);
}

#[tokio::test]
async fn malformed_config_is_reported_and_left_alone() {
    let dir = TempDir::new().unwrap();
    let path = config_path(dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let mut harness = Harness::with_config(ConfigStore::new(&path));
    let report = bootstrap(&mut harness.session).await.unwrap();

    assert!(!report.config_found);
    assert!(harness.output.contains("Failed to load config: Malformed config"));
    assert_eq!(report.modules_loaded, DEFAULT_MODULES.len());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[tokio::test]
async fn non_list_value_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = config_path(dir.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"installed_modules": "you"}"#).unwrap();

    let mut harness = Harness::with_config(ConfigStore::new(&path));
    let report = bootstrap(&mut harness.session).await.unwrap();

    assert_eq!(report.modules_loaded, 0);
    assert!(harness.output.has_line(
        "Ignoring config value installed_modules: Config value installed_modules is not a list",
        Style::Error
    ));
    assert_eq!(harness.session.registry.installed().len(), 2);
}
