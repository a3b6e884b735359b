//! Turns one input line into at most one command invocation.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, error, warn};

use crate::core::commands::NOT_FOUND_COMMAND;
use crate::core::registry::ResolvedCommand;
use crate::core::session::Session;
use crate::io::Style;

/// Nested `do`/`y` re-entries allowed before a dispatch is refused.
pub const MAX_DISPATCH_DEPTH: usize = 32;

pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Executed,
    Failed,
    Ambiguous,
    NotFound,
    Empty,
    TooDeep,
}

/// Bare web addresses become arguments to `open`.
pub fn rewrite(line: &str) -> String {
    if line.starts_with("http://") || line.starts_with("https://") {
        format!("open {line}")
    } else {
        line.to_string()
    }
}

/// Splits at the first space: `("u", "rust book")` for `"u rust book"`.
pub fn tokenize(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

impl Session {
    /// Runs one input line. Every failure is reported on the terminal; the
    /// caller only gets the outcome.
    pub fn dispatch<'a>(&'a mut self, line: &'a str) -> LocalBoxFuture<'a, DispatchOutcome> {
        Box::pin(async move {
            if self.depth >= MAX_DISPATCH_DEPTH {
                error!(line, depth = self.depth, "dispatch nested too deeply");
                self.println(
                    &format!("Command nesting too deep (limit {MAX_DISPATCH_DEPTH}), stopped at: {line}"),
                    Style::Error,
                );
                return DispatchOutcome::TooDeep;
            }

            self.depth += 1;
            let outcome = self.dispatch_line(line).await;
            self.depth -= 1;
            outcome
        })
    }

    async fn dispatch_line(&mut self, line: &str) -> DispatchOutcome {
        if line.trim().is_empty() {
            return DispatchOutcome::Empty;
        }

        let line = rewrite(line);
        let (base, rest) = tokenize(&line);
        let mut matches = self.registry.resolver().find(base);
        debug!(base, matches = matches.len(), "dispatch");

        match matches.len() {
            0 => {
                self.println(&format!("Command not found: {base}"), Style::Error);
                self.redirect_not_found(&line).await;
                DispatchOutcome::NotFound
            }
            1 => self.invoke(matches.remove(0), base, rest).await,
            _ => {
                self.println("Multiple commands found:", Style::Out);
                for candidate in &matches {
                    self.println(
                        &format!(
                            "  {} - {}",
                            candidate.qualified_name(),
                            candidate.command.description()
                        ),
                        Style::Warn,
                    );
                }
                DispatchOutcome::Ambiguous
            }
        }
    }

    async fn invoke(&mut self, resolved: ResolvedCommand, full: &str, rest: &str) -> DispatchOutcome {
        let Some(handler) = resolved.command.handler() else {
            warn!(command = %resolved.qualified_name(), "command has no handler");
            return DispatchOutcome::Executed;
        };

        match handler.run(self, full, rest).await {
            Ok(()) => DispatchOutcome::Executed,
            Err(e) => {
                debug!(command = %resolved.qualified_name(), error = ?e, "command failed");
                self.println(&format!("Failed to run command: {e}"), Style::Error);
                DispatchOutcome::Failed
            }
        }
    }

    /// Hands the whole line to the most recently installed `command_not_found`.
    async fn redirect_not_found(&mut self, line: &str) {
        let Some(fallback) = self.registry.resolver().find_latest(NOT_FOUND_COMMAND) else {
            return;
        };
        self.invoke(fallback, NOT_FOUND_COMMAND, line).await;
    }
}
