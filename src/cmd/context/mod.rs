//! Manage the contexts used to connect to Pulsar clusters.
use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::Globals;

mod current;
mod delete;
mod get;
mod rename;
mod select;
mod set;
mod show;

pub use self::set::SetArgs;

/// Manage the contexts used to connect to Pulsar clusters.
#[derive(Debug, Parser)]
pub struct ContextCli {
    /// Select the `pulsarctl context` command to run.
    #[command(subcommand)]
    pub command: ContextCmd,
}

/// Select the `pulsarctl context` command to run.
#[derive(Debug, Subcommand)]
pub enum ContextCmd {
    /// Print the name of the current context.
    Current,

    /// Delete a context and its credentials.
    #[command(alias = "del")]
    Delete(NameArg),

    /// List all known contexts.
    Get,

    /// Rename a context and its credentials.
    Rename(RenameArgs),

    /// Create a context or update fields of an existing one, then make it current.
    #[command(alias = "create")]
    Set(SetArgs),

    /// Show connection details for the current context.
    Show,

    /// Select the current context, the one used when none are specified.
    Use(NameArg),
}

/// Select the context to operate on.
#[derive(Args, Debug)]
pub struct NameArg {
    /// Name of the context.
    pub name: String,
}

/// Arguments to rename a context.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Current name of the context.
    pub old: String,

    /// New name for the context.
    pub new: String,
}

/// Execute the selected `pulsarctl context` command.
pub async fn run(globals: &Globals, cmd: &ContextCli, out: &mut dyn Write) -> Result<i32> {
    match &cmd.command {
        ContextCmd::Current => self::current::run(globals, out).await,
        ContextCmd::Delete(args) => self::delete::run(globals, &args.name, out).await,
        ContextCmd::Get => self::get::run(globals, out).await,
        ContextCmd::Rename(args) => self::rename::run(globals, args, out).await,
        ContextCmd::Set(args) => self::set::run(globals, args, out).await,
        ContextCmd::Show => self::show::run(globals, out).await,
        ContextCmd::Use(args) => self::select::run(globals, &args.name, out).await,
    }
}
