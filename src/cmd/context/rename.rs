//! Rename a context and its credentials.
use std::io::Write;

use anyhow::Result;

use super::RenameArgs;
use crate::config::modify_config;
use crate::errors::AlreadyExists;
use crate::errors::EmptyContextName;
use crate::errors::NotFound;
use crate::Globals;

/// Rename a context and the auth info paired with it.
///
/// The current context follows the rename.
pub async fn run(globals: &Globals, args: &RenameArgs, out: &mut dyn Write) -> Result<i32> {
    let old = args.old.as_str();
    let new = args.new.as_str();
    if old.is_empty() || new.is_empty() {
        anyhow::bail!(EmptyContextName);
    }

    let access = globals.access.as_ref();
    let mut config = access.starting_config().await?;
    let path = access.default_filename().display().to_string();

    let context = match config.contexts.remove(old) {
        Some(context) => context,
        None => anyhow::bail!(NotFound::context(old, path)),
    };
    let auth = match config.auth_infos.remove(old) {
        Some(auth) => auth,
        None => anyhow::bail!(NotFound::auth_info(old, path)),
    };
    if config.contexts.contains_key(new) || config.auth_infos.contains_key(new) {
        anyhow::bail!(AlreadyExists {
            old: old.to_string(),
            new: new.to_string(),
            path,
        });
    }

    config.contexts.insert(new.to_string(), context);
    config.auth_infos.insert(new.to_string(), auth);
    if config.current_context == old {
        config.current_context = new.to_string();
    }

    modify_config(access, &config).await?;
    writeln!(out, "Context \"{}\" renamed to \"{}\".", old, new)?;
    Ok(0)
}
