//! Abstract how information is presented to users to enable different interaction styles.
//!
//! For example:
//!
//! - The default `Human` formatter aims to provide output suitable for an interactive session
//!   where people issue commands and review results.
//! - The `JSON` formatter aims to provide output suitable for an automated script.
use std::io::Write;

use anyhow::Result;
use clap::Args;
use clap::ValueEnum;

mod human;
mod json;

use crate::config::Connection;
use crate::config::Context;

/// Present a list of [`Context`]s to the user.
pub trait ContextList {
    /// Append a new context into the list being formatted.
    fn append(&mut self, name: &str, context: &Context, active: bool) -> Result<()>;

    /// Handle the now complete list of contexts and emit it to the output.
    fn finish(&mut self, out: &mut dyn Write) -> Result<()>;
}

/// List of available output formats.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum FormatId {
    /// Optimise output for viewing by humans.
    #[default]
    Human,

    /// Output information as JSON documents.
    Json,
}

/// Configure output formatting for `pulsarctl`.
#[derive(Args, Debug)]
pub struct FormatOpts {
    /// Select the format to use for output.
    #[arg(
        long = "format",
        global = true,
        env = "PULSARCTL_FORMAT",
        default_value_t,
        value_enum
    )]
    pub format: FormatId,
}

/// Present information to users in their preferred format.
pub struct Formatter {
    /// Runtime strategy to execute formatting operations with.
    strategy: Box<dyn FormatterStrategy>,
}

impl Formatter {
    /// Emit the connection details of the active context.
    pub fn connection(&self, out: &mut dyn Write, connection: &Connection) -> Result<()> {
        self.strategy.connection(out, connection)
    }

    /// Start formatting a list of contexts.
    pub fn context_list(&self) -> Box<dyn ContextList> {
        self.strategy.context_list()
    }
}

/// Interface to implement user output formatting.
pub trait FormatterStrategy {
    /// Emit the connection details of the active context.
    fn connection(&self, out: &mut dyn Write, connection: &Connection) -> Result<()>;

    /// Return an object to format a list of [`Context`]s.
    fn context_list(&self) -> Box<dyn ContextList>;
}

/// Instantiate a formatter based on CLI configuration.
pub fn select(format: &FormatOpts) -> Formatter {
    let strategy: Box<dyn FormatterStrategy> = match format.format {
        FormatId::Human => Box::new(self::human::HumanFormatter),
        FormatId::Json => Box::new(self::json::JsonFormatter),
    };
    Formatter { strategy }
}
