use async_trait::async_trait;

use super::{CommandError, CommandHandler};
use crate::core::session::Session;
use crate::io::Style;

/// `help [command]`
pub struct HelpCommand;

#[async_trait(?Send)]
impl CommandHandler for HelpCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let token = rest.trim();
        if token.is_empty() {
            let lines: Vec<String> = session
                .registry
                .installed()
                .iter()
                .flat_map(|module| {
                    module.commands().iter().map(move |command| {
                        format!("- {} ({}) [{}]", command.id(), command.description(), module.id())
                    })
                })
                .collect();

            session.out("The following commands are available:");
            for line in &lines {
                session.out(line);
            }
            return Ok(());
        }

        let resolved = session.registry.resolver().resolve_unique(token)?;
        let aliases: Vec<&str> = resolved.command.aliases().collect();
        let mut lines = vec![format!(
            "{} - {}",
            resolved.qualified_name(),
            resolved.command.description()
        )];
        if !aliases.is_empty() {
            lines.push(format!("Aliases: {}", aliases.join(", ")));
        }
        if !resolved.command.is_bound() {
            lines.push("This command has no handler.".to_string());
        }

        for (index, line) in lines.iter().enumerate() {
            let style = if index == 0 { Style::Out } else { Style::Info };
            session.println(line, style);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::dispatcher::DispatchOutcome;
    use crate::core::testing::TestSession;
    use crate::io::Style;

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let mut harness = TestSession::new();
        harness.run("help").await;

        let lines = harness.output.lines();
        assert_eq!(lines[0], "The following commands are available:");
        assert!(lines.contains(&"- do (Run the given command) [main]".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("- modules (") && l.ends_with("[modules]")));
    }

    #[tokio::test]
    async fn test_help_for_one_command() {
        let mut harness = TestSession::new();
        harness.run("help why").await;

        assert!(harness.output.lines()[0].starts_with("main:y - "));
        assert!(harness.output.has_line("Aliases: why", Style::Info));
    }

    #[tokio::test]
    async fn test_help_for_unknown_command() {
        let mut harness = TestSession::new();
        assert_eq!(harness.run("help xyzzy").await, DispatchOutcome::Failed);
        assert!(harness
            .output
            .has_line("Failed to run command: command not found: xyzzy", Style::Error));
    }
}
