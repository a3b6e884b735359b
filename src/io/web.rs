use std::cell::RefCell;
use std::rc::Rc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::info;

use super::{ConsoleTerminal, Style, Terminal};

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Fire-and-forget page navigation.
pub trait Navigator {
    fn goto(&mut self, url: &str);
    fn new_tab(&mut self, url: &str);
    fn new_window(&mut self, url: &str);
}

/// Reports the target on a terminal instead of driving a browser.
pub struct ConsoleNavigator<T: Terminal = ConsoleTerminal> {
    terminal: T,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self::with_terminal(ConsoleTerminal::new())
    }
}

impl Default for ConsoleNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Terminal> ConsoleNavigator<T> {
    pub fn with_terminal(terminal: T) -> Self {
        Self { terminal }
    }

    fn announce(&mut self, text: &str) {
        self.terminal.println(text, Style::Info);
    }
}

impl<T: Terminal> Navigator for ConsoleNavigator<T> {
    fn goto(&mut self, url: &str) {
        info!(url, "goto");
        self.announce(&format!("Opening {url}"));
    }

    fn new_tab(&mut self, url: &str) {
        info!(url, "new tab");
        self.announce(&format!("Opening {url} in a new tab"));
    }

    fn new_window(&mut self, url: &str) {
        info!(url, "new window");
        self.announce(&format!("Opening {url} in a new window"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Goto(String),
    NewTab(String),
    NewWindow(String),
}

impl Navigation {
    pub fn url(&self) -> &str {
        match self {
            Navigation::Goto(url) | Navigation::NewTab(url) | Navigation::NewWindow(url) => url,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<Navigation>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<Navigation> {
        self.visits.borrow().clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.visits.borrow().last().map(|n| n.url().to_string())
    }
}

impl Navigator for RecordingNavigator {
    fn goto(&mut self, url: &str) {
        self.visits.borrow_mut().push(Navigation::Goto(url.to_string()));
    }

    fn new_tab(&mut self, url: &str) {
        self.visits.borrow_mut().push(Navigation::NewTab(url.to_string()));
    }

    fn new_window(&mut self, url: &str) {
        self.visits
            .borrow_mut()
            .push(Navigation::NewWindow(url.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("rust lang"), "rust%20lang");
        assert_eq!(encode_uri_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_uri_component("it's (ok)!*~_.-"), "it's%20(ok)!*~_.-");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_recording_navigator_shares_history() {
        let recorder = RecordingNavigator::new();
        let mut navigator = recorder.clone();
        navigator.goto("https://a");
        navigator.new_tab("https://b");

        assert_eq!(
            recorder.visits(),
            vec![
                Navigation::Goto("https://a".into()),
                Navigation::NewTab("https://b".into())
            ]
        );
        assert_eq!(recorder.last_url().as_deref(), Some("https://b"));
    }

    #[test]
    fn test_console_navigator_reports_on_its_terminal() {
        let (terminal, log) = crate::io::MemoryTerminal::new();
        let mut navigator = ConsoleNavigator::with_terminal(terminal);
        navigator.goto("https://a");
        navigator.new_window("https://b");

        assert!(log.has_line("Opening https://a", Style::Info));
        assert!(log.has_line("Opening https://b in a new window", Style::Info));
    }
}
