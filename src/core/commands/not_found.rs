use async_trait::async_trait;

use super::{CommandError, CommandHandler};
use crate::core::session::Session;

/// A `command_not_found` handler: proposes a command and remembers it so a
/// bare `y` runs the suggestion.
#[derive(Debug, Clone)]
pub struct SuggestCommand {
    prefix: Option<&'static str>,
}

impl SuggestCommand {
    /// Always suggests `help`.
    pub fn help() -> Self {
        Self { prefix: None }
    }

    /// Suggests `<prefix> <line>`, e.g. a web search for the unknown line.
    pub fn with_prefix(prefix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
        }
    }

    pub fn suggestion(&self, line: &str) -> String {
        match self.prefix {
            Some(prefix) => format!("{prefix} {line}"),
            None => "help".to_string(),
        }
    }
}

#[async_trait(?Send)]
impl CommandHandler for SuggestCommand {
    async fn run(&self, session: &mut Session, _full: &str, rest: &str) -> Result<(), CommandError> {
        let suggestion = self.suggestion(rest);
        session.out(&format!(
            "The command \"{rest}\" could not be found. Did you mean \"{suggestion}\"?"
        ));
        session.registers.y = suggestion;
        Ok(())
    }
}
