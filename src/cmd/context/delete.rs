//! Delete a context and its credentials.
use std::io::Write;

use anyhow::Result;
use slog::debug;

use crate::config::modify_config;
use crate::errors::EmptyContextName;
use crate::errors::NotFound;
use crate::Globals;

/// Delete a context and the auth info paired with it.
///
/// Deleting the current context leaves the configuration without a usable current context.
pub async fn run(globals: &Globals, name: &str, out: &mut dyn Write) -> Result<i32> {
    if name.is_empty() {
        anyhow::bail!(EmptyContextName);
    }

    let access = globals.access.as_ref();
    let mut config = access.starting_config().await?;
    let path = access.default_filename().display().to_string();
    if !config.contexts.contains_key(name) {
        anyhow::bail!(NotFound::context(name, path));
    }
    if !config.auth_infos.contains_key(name) {
        anyhow::bail!(NotFound::auth_info(name, path));
    }

    if config.current_context == name {
        debug!(globals.logger, "Deleting the current context"; "context" => name);
        writeln!(
            out,
            "warning: this removed your active context, \
             use \"pulsarctl context use\" to select a different one"
        )?;
    }

    config.contexts.remove(name);
    config.auth_infos.remove(name);
    modify_config(access, &config).await?;
    writeln!(out, "deleted context {} from {}", name, path)?;
    Ok(0)
}
