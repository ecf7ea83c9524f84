//! CLI interface for the `pulsarctl` client.
use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

pub mod context;

use crate::formatter::FormatOpts;
use crate::logging::LogOpt;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " [",
    env!("GIT_BUILD_HASH"),
    "; ",
    env!("GIT_BUILD_TAINT"),
    "]",
);

/// CLI definition for the pulsarctl binary.
#[derive(Debug, Parser)]
#[command(about)]
#[command(propagate_version = true)]
#[command(version = VERSION)]
pub struct Cli {
    /// Select the configuration files to operate on.
    #[command(flatten)]
    pub config: ConfigOpt,

    /// Select the `pulsarctl` command to run.
    #[command(subcommand)]
    pub command: Command,

    /// Configure how `pulsarctl` output is formatted.
    #[command(flatten)]
    pub format: FormatOpts,

    /// Configure how `pulsarctl` logs are emitted.
    #[command(flatten)]
    pub log: LogOpt,
}

/// Configuration file selection options.
#[derive(Args, Debug)]
pub struct ConfigOpt {
    /// Operate on this configuration file only, ignoring PULSARCONFIG and the default file.
    #[arg(long = "config", global = true, env = "PULSARCTL_CONFIG_FILE")]
    pub file: Option<PathBuf>,
}

/// Select the `pulsarctl` command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the contexts used to connect to Pulsar clusters.
    Context(context::ContextCli),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn clap_integrity_check() {
        let command = crate::Cli::command();
        command.debug_assert();
    }
}
