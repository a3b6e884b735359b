use clap::Parser;
use gterm::error::ShellError;
use gterm::flags::Flags;
use gterm::logging;
use gterm::shell::Shell;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ShellError> {
    let flags = Flags::parse();
    logging::init(&flags)?;

    let mut shell = Shell::new(flags)?;
    shell.run().await
}
