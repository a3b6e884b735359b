use super::SearchCommand;
use crate::core::registry::{Module, RegistryError};

pub fn install(module: &mut Module) -> Result<(), RegistryError> {
    module.register_command(
        "google",
        SearchCommand::new("https://www.google.com/search?q={q}", "https://www.google.com/"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::testing::TestSession;

    #[tokio::test]
    async fn test_goog() {
        let mut harness = TestSession::with_modules(&["google"]).await;
        harness.run("goog borrow checker").await;
        assert_eq!(
            harness.web.last_url().as_deref(),
            Some("https://www.google.com/search?q=borrow%20checker")
        );
        assert!(harness.output.contains("Please wait..."));
    }
}
