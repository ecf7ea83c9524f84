//! Find, migrate and merge the configuration files `pulsarctl` reads.
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context as _;
use anyhow::Result;
use slog::debug;
use slog::info;
use slog::warn;
use slog::Logger;

use super::codec;
use super::merge::merge_layered;
use super::paths::resolve_all;
use super::Config;

/// Environment variable listing the configuration files to load.
pub const CONFIG_PATH_ENV_VAR: &str = "PULSARCONFIG";

/// Directory, relative to the user home, holding user configuration files.
pub const RECOMMENDED_HOME_DIR: &str = ".config";

/// Path, relative to [`RECOMMENDED_HOME_DIR`], of the default configuration file.
pub const RECOMMENDED_FILE_NAME: &str = "pulsar/config";

/// Path, relative to the user home, configuration was stored at by older versions.
const LEGACY_HOME_FILE: &str = ".pulsar/.pulsarconfig";

/// Errors migrating configuration files from legacy locations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to inspect a configuration path while looking for migrations.
    #[error("unable to inspect configuration path '{0}'")]
    // (path,)
    Inspect(String),

    /// The migration source is a directory and can't be copied.
    #[error("cannot migrate '{legacy}' to '{destination}' because it is a directory")]
    MigrateDirectory { destination: String, legacy: String },

    /// Unable to copy the migration source to its destination.
    #[error("unable to migrate '{legacy}' to '{destination}'")]
    MigrateCopy { destination: String, legacy: String },

    /// The path to the user home directory could not be determined.
    #[error("unable to determine the current user's home directory")]
    NoHomeDir,
}

/// Rules to locate and combine configuration files.
#[derive(Clone, Debug)]
pub struct LoadingRules {
    /// Skip resolving relative file references after loading.
    pub do_not_resolve_paths: bool,

    /// Logger for diagnostics about the loading process.
    pub logger: Logger,

    /// One-time copies to perform before loading: destination file => legacy source file.
    pub migration_rules: BTreeMap<PathBuf, PathBuf>,

    /// Configuration files to load, highest priority first.
    pub precedence: Vec<PathBuf>,

    /// Warn users when none of the files in the precedence list exist.
    pub warn_if_all_missing: bool,
}

impl LoadingRules {
    /// Loading rules for the given list of files, with no migrations.
    pub fn new(logger: Logger, precedence: Vec<PathBuf>) -> LoadingRules {
        LoadingRules {
            do_not_resolve_paths: false,
            logger,
            migration_rules: BTreeMap::new(),
            precedence,
            warn_if_all_missing: false,
        }
    }

    /// Default loading rules for the current process environment.
    ///
    /// If the `PULSARCONFIG` environment variable is set the files it lists are loaded,
    /// otherwise the recommended file in the user home is.
    pub fn from_env(logger: Logger) -> Result<LoadingRules> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        let env_files = std::env::var_os(CONFIG_PATH_ENV_VAR);
        Ok(LoadingRules::from_parts(logger, &home, env_files.as_deref()))
    }

    /// Build the default loading rules from a home directory and optional path list.
    pub fn from_parts(logger: Logger, home: &Path, env_files: Option<&OsStr>) -> LoadingRules {
        let recommended = recommended_home_file(home);
        let (precedence, warn_if_all_missing) = match env_files {
            Some(files) if !files.is_empty() => {
                let files = std::env::split_paths(files)
                    .filter(|path| !path.as_os_str().is_empty())
                    .collect();
                (deduplicate(files), true)
            }
            _ => (vec![recommended.clone()], false),
        };

        let mut migration_rules = BTreeMap::new();
        migration_rules.insert(recommended, home.join(LEGACY_HOME_FILE));
        LoadingRules {
            do_not_resolve_paths: false,
            logger,
            migration_rules,
            precedence,
            warn_if_all_missing,
        }
    }

    /// Load and merge all configuration files, after performing any migration.
    ///
    /// Missing files are skipped, as are files that fail to load (after logging why).
    /// The first file to define a context or auth info wins that entry entirely,
    /// the first file to set the current context wins that value.
    pub async fn load(&self) -> Result<Config> {
        self.migrate().await?;

        let mut missing = Vec::new();
        let mut configs = Vec::new();
        for path in &self.precedence {
            if path.as_os_str().is_empty() {
                continue;
            }
            match codec::load_from_file(path).await {
                Ok(config) => {
                    debug!(self.logger, "Loaded configuration file"; "path" => %path.display());
                    configs.push(config);
                }
                Err(error) if codec::is_not_found(&error) => {
                    missing.push(path.display().to_string());
                }
                Err(error) => {
                    warn!(
                        self.logger, "Error loading configuration file, skipping it";
                        "path" => %path.display(), "error" => format!("{:#}", error)
                    );
                }
            }
        }

        if self.warn_if_all_missing && !missing.is_empty() && configs.is_empty() {
            warn!(self.logger, "Config not found: {}", missing.join(", "));
        }

        let mut config = merge_layered(&configs);
        if !self.do_not_resolve_paths {
            resolve_all(&mut config)?;
        }
        Ok(config)
    }

    /// Copy configuration files from legacy locations to their current ones.
    ///
    /// Destinations that already exist are never overwritten.
    /// Paths that can't be accessed due to permissions are skipped.
    pub async fn migrate(&self) -> Result<()> {
        for (destination, source) in &self.migration_rules {
            match tokio::fs::metadata(destination).await {
                Ok(_) => continue,
                Err(error) if error.kind() == ErrorKind::PermissionDenied => continue,
                Err(error) if error.kind() == ErrorKind::NotFound => (),
                Err(error) => {
                    let path = destination.display().to_string();
                    return Err(error).context(Error::Inspect(path));
                }
            }

            let metadata = match tokio::fs::metadata(source).await {
                Ok(metadata) => metadata,
                Err(error)
                    if matches!(
                        error.kind(),
                        ErrorKind::NotFound | ErrorKind::PermissionDenied
                    ) =>
                {
                    continue
                }
                Err(error) => {
                    let path = source.display().to_string();
                    return Err(error).context(Error::Inspect(path));
                }
            };
            if metadata.is_dir() {
                let error = Error::MigrateDirectory {
                    destination: destination.display().to_string(),
                    legacy: source.display().to_string(),
                };
                return Err(anyhow::anyhow!(error));
            }

            info!(
                self.logger, "Migrating configuration file to its new location";
                "source" => %source.display(), "destination" => %destination.display()
            );
            codec::ensure_parent_dir(destination).await?;
            tokio::fs::copy(source, destination)
                .await
                .with_context(|| Error::MigrateCopy {
                    destination: destination.display().to_string(),
                    legacy: source.display().to_string(),
                })?;
        }
        Ok(())
    }
}

/// Path of the default configuration file for the given user home.
pub fn recommended_home_file(home: &Path) -> PathBuf {
    home.join(RECOMMENDED_HOME_DIR).join(RECOMMENDED_FILE_NAME)
}

/// Remove repeated paths, keeping the first occurrence of each.
fn deduplicate(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
