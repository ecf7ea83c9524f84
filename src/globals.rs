//! Per-invocation state shared by `pulsarctl` commands.
use anyhow::Result;
use slog::Logger;

use crate::config::ConfigAccess;
use crate::config::LoadingRules;
use crate::config::PathOptions;
use crate::formatter::Formatter;
use crate::Cli;

/// State built once per invocation and passed to every command.
pub struct Globals {
    /// Access to the configuration files selected for this invocation.
    pub access: Box<dyn ConfigAccess>,

    /// Parsed CLI arguments.
    pub cli: Cli,

    /// Configured process formatter for all output.
    pub formatter: Formatter,

    /// Process logger, also used by the configuration loader.
    pub logger: Logger,
}

impl Globals {
    /// Initialise `pulsarctl` process [`Globals`].
    pub fn initialise(cli: Cli) -> Result<Self> {
        let logger = crate::logging::configure(&cli.log)?;
        let formatter = crate::formatter::select(&cli.format);
        let access: Box<dyn ConfigAccess> = match &cli.config.file {
            Some(file) => {
                let rules = LoadingRules::new(logger.clone(), Vec::new());
                Box::new(PathOptions::new(rules, file.clone()))
            }
            None => Box::new(LoadingRules::from_env(logger.clone())?),
        };
        Ok(Globals {
            access,
            cli,
            formatter,
            logger,
        })
    }
}
