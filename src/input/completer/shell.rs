use std::borrow::Cow;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use super::command::CommandCompleter;
use crate::core::registry::Registry;
use crate::highlight::SyntaxHighlighter;

#[derive(Clone, Default)]
pub struct ShellCompleter {
    command_completer: CommandCompleter,
    highlighter: SyntaxHighlighter,
}

impl ShellCompleter {
    pub fn new() -> Self {
        ShellCompleter {
            command_completer: CommandCompleter::new(),
            highlighter: SyntaxHighlighter::new(),
        }
    }

    pub fn refresh(&mut self, registry: &Registry) {
        self.command_completer.refresh(registry);
    }
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(
            self.highlighter
                .highlight_command(line, |token| self.command_completer.is_known(token)),
        )
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(self.highlighter.highlight_hint(hint))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let words = words_before_cursor(&line[..pos]);
        let last_word = words.last().copied().unwrap_or_default();
        let start = pos - last_word.len();
        let matches = if words.len() == 1 {
            self.command_completer.complete_command(last_word)
        } else {
            self.command_completer.complete_argument(&words)
        };

        Ok((start, matches))
    }
}

/// Words typed so far. Trailing whitespace starts an empty word.
fn words_before_cursor(line: &str) -> Vec<&str> {
    let mut words: Vec<&str> = line.split_whitespace().collect();
    if line.is_empty() || line.ends_with(char::is_whitespace) {
        words.push("");
    }
    words
}
