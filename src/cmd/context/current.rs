//! Print the name of the current context.
use std::io::Write;

use anyhow::Result;

use crate::errors::CurrentContextNotSet;
use crate::Globals;

/// Print the name of the current context.
pub async fn run(globals: &Globals, out: &mut dyn Write) -> Result<i32> {
    let config = globals.access.starting_config().await?;
    if config.current_context.is_empty() {
        anyhow::bail!(CurrentContextNotSet);
    }
    writeln!(out, "{}", config.current_context)?;
    Ok(0)
}
