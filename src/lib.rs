//! Manage the contexts used by `pulsarctl` to connect to Apache Pulsar clusters.
use anyhow::Result;
use clap::Parser;

mod cmd;
mod formatter;
mod globals;
mod logging;

pub mod config;
pub mod errors;

use self::cmd::Cli;
use self::globals::Globals;

/// Initialise the pulsarctl process and invoke a command implementation.
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let globals = Globals::initialise(cli)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match &globals.cli.command {
        cmd::Command::Context(context) => cmd::context::run(&globals, context, &mut out).await,
    }
}
