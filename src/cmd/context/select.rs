//! Select the current context, the one used when none are specified.
use std::io::Write;

use anyhow::Result;

use crate::config::modify_config;
use crate::errors::EmptyContextName;
use crate::errors::NotFound;
use crate::Globals;

/// Select the current context, the one used when none are specified.
pub async fn run(globals: &Globals, name: &str, out: &mut dyn Write) -> Result<i32> {
    if name.is_empty() {
        anyhow::bail!(EmptyContextName);
    }

    let access = globals.access.as_ref();
    let mut config = access.starting_config().await?;
    if !config.contexts.contains_key(name) {
        let path = access.default_filename().display().to_string();
        anyhow::bail!(NotFound::context(name, path));
    }

    config.current_context = name.to_string();
    modify_config(access, &config).await?;
    writeln!(out, "Switched to context \"{}\".", name)?;
    Ok(0)
}
