use std::path::PathBuf;

use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};
use tracing::{debug, warn};

pub mod startup;

use crate::{
    core::{config::ConfigPaths, config::ConfigStore, loader::ModuleLoader, session::Session},
    error::ShellError,
    flags::Flags,
    input::ShellCompleter,
    io::Style,
};

const PROMPT: &str = "> ";

pub struct Shell {
    pub(crate) editor: Editor<ShellCompleter, FileHistory>,
    pub(crate) session: Session,
    pub(crate) flags: Flags,
    pub(crate) history_file: Option<PathBuf>,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let paths = ConfigPaths::resolve(flags.config.as_deref())?;
        debug!(config = %paths.config_file.display(), "resolved paths");

        let mut editor = Editor::<ShellCompleter, FileHistory>::new()?;
        editor.set_helper(Some(ShellCompleter::new()));
        editor.set_auto_add_history(true);

        let history_file = (!flags.no_history).then(|| paths.history_file.clone());
        if let Some(path) = &history_file {
            // First start: no file yet.
            if let Err(e) = editor.load_history(path) {
                debug!(path = %path.display(), error = %e, "no history loaded");
            }
        }

        let session = Session::new(ConfigStore::new(paths.config_file), ModuleLoader::new()?);

        // Raw mode turns Ctrl-C at the prompt into ReadlineError::Interrupted;
        // this only fires while a command is running.
        ctrlc::set_handler(move || {
            eprintln!("\nRunning commands cannot be interrupted.");
        })?;

        Ok(Shell {
            editor,
            session,
            flags,
            history_file,
        })
    }

    pub async fn run(&mut self) -> Result<(), ShellError> {
        let report = startup::bootstrap(&mut self.session).await?;
        if !self.flags.quiet {
            self.session.println(
                &format!(
                    "gterm {} ({} modules). Type help to list commands.",
                    env!("CARGO_PKG_VERSION"),
                    report.modules_loaded
                ),
                Style::Info,
            );
        }
        self.refresh_completions();

        if let Some(line) = self.flags.cmd.clone() {
            self.session.println(&format!("> {line}"), Style::Out);
            self.session.dispatch(&line).await;
            self.refresh_completions();
        }

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    self.session.dispatch(&line).await;
                    self.refresh_completions();
                }
                Err(ReadlineError::Interrupted) => {
                    self.session.io.clear();
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    self.save_history();
                    return Err(e.into());
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn refresh_completions(&mut self) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.refresh(&self.session.registry);
        }
    }

    fn save_history(&mut self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "cannot create history directory");
                return;
            }
        }
        if let Err(e) = self.editor.save_history(path) {
            warn!(path = %path.display(), error = %e, "couldn't save history");
        }
    }
}
