mod completer;

pub use completer::{CommandCompleter, ShellCompleter};
