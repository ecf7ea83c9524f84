//! Access to the configuration for commands that read and update it.
use std::path::PathBuf;

use anyhow::Result;
use slog::Logger;

use super::codec;
use super::Config;
use super::LoadingRules;

/// Interface commands use to load configuration and find where to write updates.
#[async_trait::async_trait]
pub trait ConfigAccess: Send + Sync {
    /// Files used to load and inspect the configuration, highest priority first.
    fn loading_precedence(&self) -> Vec<PathBuf>;

    /// The configuration commands operate against.
    ///
    /// Missing files result in an empty configuration, not an error.
    async fn starting_config(&self) -> Result<Config>;

    /// File to write new entries into, created if needed.
    fn default_filename(&self) -> PathBuf;

    /// Whether file references must be made relative to their file when written back.
    fn relativize_paths(&self) -> bool;

    /// Logger for diagnostics about configuration access.
    fn logger(&self) -> &Logger;
}

#[async_trait::async_trait]
impl ConfigAccess for LoadingRules {
    fn loading_precedence(&self) -> Vec<PathBuf> {
        self.precedence.clone()
    }

    async fn starting_config(&self) -> Result<Config> {
        match self.load().await {
            Ok(config) => Ok(config),
            Err(error) if codec::is_not_found(&error) => Ok(Config::new()),
            Err(error) => Err(error),
        }
    }

    /// The first file in the precedence list that exists or, if none do, the first entry.
    fn default_filename(&self) -> PathBuf {
        self.precedence
            .iter()
            .find(|path| !path.as_os_str().is_empty() && path.exists())
            .or_else(|| self.precedence.first())
            .cloned()
            .unwrap_or_default()
    }

    fn relativize_paths(&self) -> bool {
        !self.do_not_resolve_paths
    }

    fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Access a single, explicitly selected, configuration file.
///
/// File references are used exactly as found in the file.
#[derive(Clone, Debug)]
pub struct PathOptions {
    /// Full path to the only configuration file to load and update.
    pub global_file: PathBuf,

    /// Rules used to load the file, including any migration to perform.
    pub rules: LoadingRules,
}

impl PathOptions {
    /// Access the given file, loading it with a copy of the given rules.
    pub fn new(rules: LoadingRules, global_file: PathBuf) -> PathOptions {
        let mut rules = rules;
        rules.precedence = vec![global_file.clone()];
        rules.do_not_resolve_paths = true;
        rules.warn_if_all_missing = false;
        PathOptions { global_file, rules }
    }
}

#[async_trait::async_trait]
impl ConfigAccess for PathOptions {
    fn loading_precedence(&self) -> Vec<PathBuf> {
        vec![self.global_file.clone()]
    }

    async fn starting_config(&self) -> Result<Config> {
        self.rules.starting_config().await
    }

    fn default_filename(&self) -> PathBuf {
        self.global_file.clone()
    }

    fn relativize_paths(&self) -> bool {
        false
    }

    fn logger(&self) -> &Logger {
        &self.rules.logger
    }
}
