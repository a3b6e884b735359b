use std::time::Duration;

use async_trait::async_trait;

use super::{CommandError, CommandHandler};
use crate::core::session::Session;

pub struct EchoCommand;

#[async_trait(?Send)]
impl CommandHandler for EchoCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        session.out(rest);
        Ok(())
    }
}

pub struct ClearCommand;

#[async_trait(?Send)]
impl CommandHandler for ClearCommand {
    async fn run(&self, session: &mut Session, _full: &str, _rest: &str) -> Result<(), CommandError> {
        session.io.clear();
        Ok(())
    }
}

/// `sleep <ms>`. Only the current dispatch chain waits.
pub struct SleepCommand;

#[async_trait(?Send)]
impl CommandHandler for SleepCommand {
    async fn run(&self, _session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let ms: u64 = rest
            .trim()
            .parse()
            .map_err(|_| CommandError::InvalidArguments(format!("not a number of milliseconds: {rest:?}")))?;
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}

/// `open <href>`, navigated to verbatim.
pub struct OpenCommand;

#[async_trait(?Send)]
impl CommandHandler for OpenCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        if rest.is_empty() {
            return Err(CommandError::InvalidArguments("usage: open <url>".to_string()));
        }
        session.web.goto(rest);
        session.out("Please wait...");
        Ok(())
    }
}

pub struct CopyCommand;

#[async_trait(?Send)]
impl CommandHandler for CopyCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        if rest.is_empty() {
            session.recopy();
        } else {
            session.copy(rest);
        }
        let copied = session.registers.last_copy.clone();
        session.out(&format!("Copied to clipboard: {copied}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::dispatcher::DispatchOutcome;
    use crate::core::testing::TestSession;
    use crate::io::{Navigation, Style};

    #[tokio::test]
    async fn test_echo_and_clear() {
        let mut harness = TestSession::new();
        harness.run("echo hello  world").await;
        assert!(harness.output.has_line("hello  world", Style::Out));

        harness.run("clear").await;
        assert!(harness.output.entries().is_empty());
    }

    #[tokio::test]
    async fn test_open_is_verbatim() {
        let mut harness = TestSession::new();
        harness.run("open not a url").await;

        assert_eq!(harness.web.visits(), vec![Navigation::Goto("not a url".into())]);
        assert!(harness.output.contains("Please wait..."));
    }

    #[tokio::test]
    async fn test_open_without_target_fails() {
        let mut harness = TestSession::new();
        assert_eq!(harness.run("open").await, DispatchOutcome::Failed);
        assert!(harness.output.contains("Failed to run command: invalid arguments"));
        assert!(harness.web.visits().is_empty());
    }

    #[tokio::test]
    async fn test_copy_prints_last_copy() {
        let mut harness = TestSession::new();
        harness.run("copy abc").await;
        assert!(harness.output.has_line("Copied to clipboard: abc", Style::Out));

        harness.run("copy").await;
        assert_eq!(harness.clipboard.history(), vec!["abc", "abc"]);
    }

    #[tokio::test]
    async fn test_sleep() {
        let mut harness = TestSession::new();
        let started = std::time::Instant::now();

        assert_eq!(harness.run("sleep 20").await, DispatchOutcome::Executed);
        assert!(started.elapsed() >= std::time::Duration::from_millis(20));

        assert_eq!(harness.run("sleep soon").await, DispatchOutcome::Failed);
    }
}
