//! Persist changes to the configuration back to the files they belong to.
//!
//! Only entries that differ from what is on disk are written:
//!
//! - The current context is written to the default file, or cleared in the
//!   first file that sets it.
//! - New and changed contexts are written to the default file.
//! - New and changed auth infos are written to the file they were loaded from,
//!   or the default file for new entries.
//! - Removed entries are deleted from the same files.
//!
//! Writes are not transactional: if a write fails, files already written are left as they are.
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use slog::debug;
use slog::Logger;

use super::codec;
use super::lock::LockSet;
use super::paths::relativize_paths;
use super::AuthInfo;
use super::Config;
use super::ConfigAccess;

/// The configuration on disk does not agree with the loaded configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConsistencyError {
    /// The current context must be cleared but no configuration file sets it.
    #[error("no configuration file sets the current context to clear")]
    NoCurrentContextToClear,
}

/// Write the differences between the configuration on disk and `desired`.
///
/// All files in the access precedence list are locked for the duration of the update
/// and the starting configuration is loaded again once the locks are held.
pub async fn modify_config(access: &dyn ConfigAccess, desired: &Config) -> Result<()> {
    let logger = access.logger().clone();
    let _locks = LockSet::acquire(&logger, access.loading_precedence()).await?;

    let starting = access.starting_config().await?;
    if same_config(&starting, desired) {
        debug!(logger, "Configuration unchanged, nothing to write");
        return Ok(());
    }

    if starting.current_context != desired.current_context {
        write_current_context(access, &desired.current_context).await?;
    }

    // Contexts sharing a destination are written together once all are set.
    let mut seen: BTreeMap<PathBuf, Config> = BTreeMap::new();
    for (name, context) in &desired.contexts {
        if starting.contexts.get(name) == Some(context) {
            continue;
        }
        let destination = access.default_filename();
        if !seen.contains_key(&destination) {
            let config = config_from_file(&destination).await?;
            seen.insert(destination.clone(), config);
        }
        if let Some(config) = seen.get_mut(&destination) {
            config.contexts.insert(name.clone(), context.clone());
        }
    }
    for (destination, config) in &seen {
        write(&logger, config, destination).await?;
    }

    for (name, auth) in &desired.auth_infos {
        let unchanged = starting
            .auth_infos
            .get(name)
            .map(|starting| same_auth(starting, auth))
            .unwrap_or(false);
        if unchanged {
            continue;
        }

        let destination = destination_of(access, auth);
        let mut config = config_from_file(&destination).await?;
        let mut auth = auth.clone();
        auth.location_of_origin = destination.clone();
        if access.relativize_paths() {
            let base = destination.parent().unwrap_or_else(|| Path::new(""));
            relativize_paths(auth.file_references_mut(), base)?;
        }
        config.auth_infos.insert(name.clone(), auth);
        write(&logger, &config, &destination).await?;
    }

    for name in starting.contexts.keys() {
        if desired.contexts.contains_key(name) {
            continue;
        }
        let destination = access.default_filename();
        let mut config = config_from_file(&destination).await?;
        config.contexts.remove(name);
        write(&logger, &config, &destination).await?;
    }

    for (name, auth) in &starting.auth_infos {
        if desired.auth_infos.contains_key(name) {
            continue;
        }
        let destination = destination_of(access, auth);
        let mut config = config_from_file(&destination).await?;
        config.auth_infos.remove(name);
        write(&logger, &config, &destination).await?;
    }

    Ok(())
}

/// Set the current context in the default file, or clear it from the first file that sets it.
async fn write_current_context(access: &dyn ConfigAccess, current: &str) -> Result<()> {
    let logger = access.logger();
    if !current.is_empty() {
        let destination = access.default_filename();
        let mut config = config_from_file(&destination).await?;
        config.current_context = current.to_string();
        return write(logger, &config, &destination).await;
    }

    for path in access.loading_precedence() {
        if path.as_os_str().is_empty() || !path.exists() {
            continue;
        }
        let mut config = config_from_file(&path).await?;
        if config.current_context.is_empty() {
            continue;
        }
        config.current_context.clear();
        return write(logger, &config, &path).await;
    }

    anyhow::bail!(ConsistencyError::NoCurrentContextToClear)
}

/// Load a configuration file for update, missing files are empty configurations.
async fn config_from_file(path: &Path) -> Result<Config> {
    match codec::load_from_file(path).await {
        Ok(config) => Ok(config),
        Err(error) if codec::is_not_found(&error) => Ok(Config::new()),
        Err(error) => Err(error),
    }
}

/// File an auth info is written to: where it came from or the default file.
fn destination_of(access: &dyn ConfigAccess, auth: &AuthInfo) -> PathBuf {
    if auth.location_of_origin.as_os_str().is_empty() {
        return access.default_filename();
    }
    auth.location_of_origin.clone()
}

/// Compare auth infos ignoring where they were loaded from.
fn same_auth(left: &AuthInfo, right: &AuthInfo) -> bool {
    let mut left = left.clone();
    let mut right = right.clone();
    left.location_of_origin = PathBuf::new();
    right.location_of_origin = PathBuf::new();
    left == right
}

/// Compare configurations ignoring where auth infos were loaded from.
fn same_config(left: &Config, right: &Config) -> bool {
    left.current_context == right.current_context
        && left.contexts == right.contexts
        && left.auth_infos.len() == right.auth_infos.len()
        && left.auth_infos.iter().all(|(name, auth)| {
            right
                .auth_infos
                .get(name)
                .map(|other| same_auth(auth, other))
                .unwrap_or(false)
        })
}

async fn write(logger: &Logger, config: &Config, path: &Path) -> Result<()> {
    debug!(logger, "Writing configuration file"; "path" => %path.display());
    codec::write_to_file(config, path).await
}
