use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gterm", version, about, long_about = None)]
pub struct Flags {
    /// Config file to use instead of the default one
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Only log errors and skip the startup banner
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Run this line once before the prompt appears
    #[arg(long, value_name = "LINE")]
    pub cmd: Option<String>,

    /// Neither read nor write the input history file
    #[arg(long)]
    pub no_history: bool,
}
