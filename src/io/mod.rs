//! Narrow interfaces to the world outside the dispatcher: text output,
//! page navigation and the clipboard.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use tracing::debug;

use crate::highlight::SyntaxHighlighter;

mod clipboard;
mod web;

pub use clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard};
pub use web::{encode_uri_component, ConsoleNavigator, Navigation, Navigator, RecordingNavigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Out,
    Info,
    Warn,
    Error,
}

pub trait Terminal {
    fn print(&mut self, text: &str, style: Style);

    fn println(&mut self, text: &str, style: Style) {
        self.print(&format!("{text}\n"), style);
    }

    fn clear(&mut self);
}

pub struct ConsoleTerminal {
    highlighter: SyntaxHighlighter,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            highlighter: SyntaxHighlighter::new(),
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTerminal {
    fn write(&self, text: &str) {
        emit(&mut std::io::stdout().lock(), text);
    }
}

/// Writes and flushes `text`. Failures are logged and reported as `false`;
/// a broken pipe never aborts a command.
fn emit(out: &mut impl Write, text: &str) -> bool {
    match write!(out, "{text}").and_then(|_| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "terminal write failed");
            false
        }
    }
}

impl Terminal for ConsoleTerminal {
    fn print(&mut self, text: &str, style: Style) {
        self.write(&self.highlighter.paint(text, style));
    }

    fn clear(&mut self) {
        self.write("\x1b[2J\x1b[H");
    }
}

/// Everything a [`MemoryTerminal`] has printed, shareable with the test that
/// created it.
#[derive(Debug, Clone, Default)]
pub struct OutputLog(Rc<RefCell<Vec<(String, Style)>>>);

impl OutputLog {
    pub fn entries(&self) -> Vec<(String, Style)> {
        self.0.borrow().clone()
    }

    /// Printed text with trailing newlines dropped, one entry per print.
    pub fn lines(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .map(|(text, _)| text.trim_end_matches('\n').to_string())
            .collect()
    }

    pub fn transcript(&self) -> String {
        self.0.borrow().iter().map(|(text, _)| text.as_str()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.transcript().contains(needle)
    }

    pub fn has_line(&self, line: &str, style: Style) -> bool {
        self.0
            .borrow()
            .iter()
            .any(|(text, s)| *s == style && text.trim_end_matches('\n') == line)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Default)]
pub struct MemoryTerminal {
    log: OutputLog,
    clears: usize,
}

impl MemoryTerminal {
    pub fn new() -> (Self, OutputLog) {
        let terminal = Self::default();
        let log = terminal.log.clone();
        (terminal, log)
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Terminal for MemoryTerminal {
    fn print(&mut self, text: &str, style: Style) {
        self.log.0.borrow_mut().push((text.to_string(), style));
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.log.clear();
    }
}
