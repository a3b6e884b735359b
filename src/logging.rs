use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::ShellError;
use crate::flags::Flags;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(flags: &Flags) -> &'static str {
    if flags.debug {
        "gterm=debug,reqwest=warn,hyper_util=warn"
    } else if flags.quiet {
        "gterm=error"
    } else {
        "gterm=warn"
    }
}

/// Installs the global subscriber. Logs go to stderr so they never
/// interleave with command output.
pub fn init(flags: &Flags) -> Result<(), ShellError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(flags)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| ShellError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let mut flags = Flags::default();
        assert_eq!(default_directive(&flags), "gterm=warn");

        flags.debug = true;
        assert!(default_directive(&flags).starts_with("gterm=debug"));

        flags.debug = false;
        flags.quiet = true;
        assert_eq!(default_directive(&flags), "gterm=error");
    }
}
