use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

/// Best-effort clipboard access.
pub trait Clipboard {
    fn copy(&mut self, text: &str);
}

/// Asks the hosting terminal emulator to set the clipboard (OSC 52).
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for Osc52Clipboard {
    fn copy(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = write!(stdout, "{}", Self::sequence(text)).and_then(|_| stdout.flush()) {
            debug!(error = %e, "clipboard write failed");
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    copied: Rc<RefCell<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.copied.borrow().last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.copied.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) {
        self.copied.borrow_mut().push(text.to_string());
    }
}
